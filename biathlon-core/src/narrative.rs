//! Human-readable event narrative
//!
//! Every event kind has its own message builder that takes only the fields
//! the message uses, so the argument order of one kind cannot leak into
//! another (target hits name the target before the competitor).

use crate::timing::format_time_of_day;
use crate::types::{EventKind, RaceEvent};

type MessageFn = fn(id: u32, extra: &str) -> String;

/// Message builder for each event kind
fn message_for(kind: EventKind) -> MessageFn {
    match kind {
        EventKind::Register => |id, _| format!("The competitor({id}) registered"),
        EventKind::SetScheduledStart => |id, start| {
            format!("The start time for the competitor({id}) was set by a draw to {start}")
        },
        EventKind::OnStartLine => |id, _| format!("The competitor({id}) is on the start line"),
        EventKind::ActualStart => |id, _| format!("The competitor({id}) has started"),
        EventKind::OnFiringRange => {
            |id, range| format!("The competitor({id}) is on the firing range({range})")
        }
        EventKind::TargetHit => {
            |id, target| format!("The target({target}) has been hit by competitor({id})")
        }
        EventKind::LeftFiringRange => |id, _| format!("The competitor({id}) left the firing range"),
        EventKind::EnterPenalty => |id, _| format!("The competitor({id}) entered the penalty laps"),
        EventKind::LeavePenalty => |id, _| format!("The competitor({id}) left the penalty laps"),
        EventKind::EndLap => |id, _| format!("The competitor({id}) ended the main lap"),
        EventKind::Abandon => |id, reason| format!("The competitor({id}) can`t continue: {reason}"),
    }
}

/// Narrative line for an event: `[HH:MM:SS.mmm] message`
pub fn describe(event: &RaceEvent) -> String {
    let message = message_for(event.kind)(event.competitor_id, event.extra());
    format!("[{}] {}", format_time_of_day(event.time), message)
}
