//! Log line formatter that stamps every event with wall-clock time and the simulation tick.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use time::macros::format_description;
use time::{format_description::FormatItem, OffsetDateTime};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Ticks simulated so far, shared by every [`crate::game::Game`] in the process.
static TICK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Only the low 16 bits of the tick are printed.
const TICK_DISPLAY_MASK: u64 = 0xFFFF;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:4]");

const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Produces `HH:MM:SS.ssss 0xTICK LEVEL span{..}: target: fields`.
pub struct CustomFormatter;

impl<S, N> FormatEvent<S, N> for CustomFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();

        let timestamp = OffsetDateTime::now_utc().format(&TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        paint(&mut writer, DIM, timestamp)?;
        writer.write_char(' ')?;
        paint(&mut writer, DIM, format_args!("0x{:04X}", get_tick_count() & TICK_DISPLAY_MASK))?;
        writer.write_char(' ')?;

        write_level(&mut writer, meta.level())?;
        writer.write_char(' ')?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                paint(&mut writer, BOLD, span.metadata().name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>().filter(|f| !f.is_empty()) {
                    paint(&mut writer, BOLD, "{")?;
                    write!(writer, "{}", fields)?;
                    paint(&mut writer, BOLD, "}")?;
                }
                paint(&mut writer, DIM, ":")?;
                writer.write_char(' ')?;
            }
        }

        paint(&mut writer, DIM, format_args!("{}:", meta.target()))?;
        writer.write_char(' ')?;

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn write_level(writer: &mut Writer<'_>, level: &Level) -> fmt::Result {
    let (color, text) = match *level {
        Level::TRACE => ("\x1b[35m", "TRACE"),
        Level::DEBUG => ("\x1b[34m", "DEBUG"),
        Level::INFO => ("\x1b[32m", " INFO"),
        Level::WARN => ("\x1b[33m", " WARN"),
        Level::ERROR => ("\x1b[31m", "ERROR"),
    };
    paint(writer, color, text)
}

/// Writes `value` wrapped in an ANSI style, or plain when the writer has no ANSI support.
fn paint(writer: &mut Writer<'_>, style: &str, value: impl fmt::Display) -> fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "{}{}{}", style, value, RESET)
    } else {
        write!(writer, "{}", value)
    }
}

/// Advances the global tick counter. Called once per simulated tick.
pub fn increment_tick() {
    TICK_COUNTER.fetch_add(1, Ordering::Relaxed);
}

pub fn get_tick_count() -> u64 {
    TICK_COUNTER.load(Ordering::Relaxed)
}
