//! Engine event types and the filters listeners subscribe with.
//!
//! A listener declaration carries its filter as free text, e.g.
//! `"TASK_CREATED, TASK_COMPLETED"`.  [`EventTypeFilter::parse`] decodes it:
//! tokens are separated by commas and/or whitespace, unrecognized tokens are
//! handed back to the caller, and a filter that names no recognized type
//! subscribes to every event.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// Every event the runtime can dispatch to a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    EntityCreated,
    EntityInitialized,
    EntityUpdated,
    EntityDeleted,
    EntitySuspended,
    EntityActivated,
    TimerScheduled,
    TimerFired,
    JobCanceled,
    JobExecutionSuccess,
    JobExecutionFailure,
    JobRetriesDecremented,
    Custom,
    EngineCreated,
    EngineClosed,
    ActivityStarted,
    ActivityCompleted,
    ActivityCancelled,
    ActivitySignaled,
    ActivityCompensate,
    ActivityMessageSent,
    ActivityMessageWaiting,
    ActivityMessageReceived,
    ActivityErrorReceived,
    UncaughtBpmnError,
    SequenceflowTaken,
    VariableCreated,
    VariableUpdated,
    VariableDeleted,
    TaskCreated,
    TaskAssigned,
    TaskCompleted,
    ProcessStarted,
    ProcessCompleted,
    ProcessCompletedWithErrorEndEvent,
    ProcessCancelled,
    MembershipCreated,
    MembershipDeleted,
    MembershipsDeleted,
}

impl EventType {
    /// All event types, in declaration order.
    pub const ALL: [EventType; 39] = [
        Self::EntityCreated,
        Self::EntityInitialized,
        Self::EntityUpdated,
        Self::EntityDeleted,
        Self::EntitySuspended,
        Self::EntityActivated,
        Self::TimerScheduled,
        Self::TimerFired,
        Self::JobCanceled,
        Self::JobExecutionSuccess,
        Self::JobExecutionFailure,
        Self::JobRetriesDecremented,
        Self::Custom,
        Self::EngineCreated,
        Self::EngineClosed,
        Self::ActivityStarted,
        Self::ActivityCompleted,
        Self::ActivityCancelled,
        Self::ActivitySignaled,
        Self::ActivityCompensate,
        Self::ActivityMessageSent,
        Self::ActivityMessageWaiting,
        Self::ActivityMessageReceived,
        Self::ActivityErrorReceived,
        Self::UncaughtBpmnError,
        Self::SequenceflowTaken,
        Self::VariableCreated,
        Self::VariableUpdated,
        Self::VariableDeleted,
        Self::TaskCreated,
        Self::TaskAssigned,
        Self::TaskCompleted,
        Self::ProcessStarted,
        Self::ProcessCompleted,
        Self::ProcessCompletedWithErrorEndEvent,
        Self::ProcessCancelled,
        Self::MembershipCreated,
        Self::MembershipDeleted,
        Self::MembershipsDeleted,
    ];

    /// The wire name used in listener declarations.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EntityCreated => "ENTITY_CREATED",
            Self::EntityInitialized => "ENTITY_INITIALIZED",
            Self::EntityUpdated => "ENTITY_UPDATED",
            Self::EntityDeleted => "ENTITY_DELETED",
            Self::EntitySuspended => "ENTITY_SUSPENDED",
            Self::EntityActivated => "ENTITY_ACTIVATED",
            Self::TimerScheduled => "TIMER_SCHEDULED",
            Self::TimerFired => "TIMER_FIRED",
            Self::JobCanceled => "JOB_CANCELED",
            Self::JobExecutionSuccess => "JOB_EXECUTION_SUCCESS",
            Self::JobExecutionFailure => "JOB_EXECUTION_FAILURE",
            Self::JobRetriesDecremented => "JOB_RETRIES_DECREMENTED",
            Self::Custom => "CUSTOM",
            Self::EngineCreated => "ENGINE_CREATED",
            Self::EngineClosed => "ENGINE_CLOSED",
            Self::ActivityStarted => "ACTIVITY_STARTED",
            Self::ActivityCompleted => "ACTIVITY_COMPLETED",
            Self::ActivityCancelled => "ACTIVITY_CANCELLED",
            Self::ActivitySignaled => "ACTIVITY_SIGNALED",
            Self::ActivityCompensate => "ACTIVITY_COMPENSATE",
            Self::ActivityMessageSent => "ACTIVITY_MESSAGE_SENT",
            Self::ActivityMessageWaiting => "ACTIVITY_MESSAGE_WAITING",
            Self::ActivityMessageReceived => "ACTIVITY_MESSAGE_RECEIVED",
            Self::ActivityErrorReceived => "ACTIVITY_ERROR_RECEIVED",
            Self::UncaughtBpmnError => "UNCAUGHT_BPMN_ERROR",
            Self::SequenceflowTaken => "SEQUENCEFLOW_TAKEN",
            Self::VariableCreated => "VARIABLE_CREATED",
            Self::VariableUpdated => "VARIABLE_UPDATED",
            Self::VariableDeleted => "VARIABLE_DELETED",
            Self::TaskCreated => "TASK_CREATED",
            Self::TaskAssigned => "TASK_ASSIGNED",
            Self::TaskCompleted => "TASK_COMPLETED",
            Self::ProcessStarted => "PROCESS_STARTED",
            Self::ProcessCompleted => "PROCESS_COMPLETED",
            Self::ProcessCompletedWithErrorEndEvent => "PROCESS_COMPLETED_WITH_ERROR_END_EVENT",
            Self::ProcessCancelled => "PROCESS_CANCELLED",
            Self::MembershipCreated => "MEMBERSHIP_CREATED",
            Self::MembershipDeleted => "MEMBERSHIP_DELETED",
            Self::MembershipsDeleted => "MEMBERSHIPS_DELETED",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown event type: {s}"))
    }
}

// ---------------------------------------------------------------------------
// EventTypeFilter
// ---------------------------------------------------------------------------

/// The set of event types a single listener is registered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "types", rename_all = "snake_case")]
pub enum EventTypeFilter {
    /// Receives every event.
    All,
    /// Receives only the listed types, in declaration order (duplicates kept).
    Types(Vec<EventType>),
}

impl EventTypeFilter {
    /// Decode a declaration's filter string.
    ///
    /// Returns the filter together with the tokens that did not name a known
    /// event type.
    pub fn parse(events: &str) -> (Self, Vec<String>) {
        let mut types = Vec::new();
        let mut rejected = Vec::new();

        for token in events
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            match token.parse::<EventType>() {
                Ok(t) => types.push(t),
                Err(_) => rejected.push(token.to_owned()),
            }
        }

        let filter = if types.is_empty() { Self::All } else { Self::Types(types) };
        (filter, rejected)
    }

    /// Whether a listener registered under this filter receives `event_type`.
    pub fn matches(&self, event_type: EventType) -> bool {
        match self {
            Self::All => true,
            Self::Types(types) => types.contains(&event_type),
        }
    }
}

impl Default for EventTypeFilter {
    fn default() -> Self {
        Self::All
    }
}
