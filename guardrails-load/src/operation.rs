use reqwest::Method;

/// One class of request issued by a worker. The name doubles as the aggregation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Queue,
    Runtime,
    Alerts,
    Pause,
    Resume,
}

impl Operation {
    /// Read-only calls, in the order a cycle issues them.
    pub const MONITORING: [Operation; 3] =
        [Operation::Queue, Operation::Runtime, Operation::Alerts];

    /// Rollout toggles, in the order a cycle issues them.
    pub const TOGGLES: [Operation; 2] = [Operation::Pause, Operation::Resume];

    pub const ALL: [Operation; 5] = [
        Operation::Queue,
        Operation::Runtime,
        Operation::Alerts,
        Operation::Pause,
        Operation::Resume,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Queue => "queue",
            Operation::Runtime => "runtime",
            Operation::Alerts => "alerts",
            Operation::Pause => "pause",
            Operation::Resume => "resume",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Operation::Queue | Operation::Runtime | Operation::Alerts => Method::GET,
            Operation::Pause | Operation::Resume => Method::POST,
        }
    }

    /// Path relative to the REST prefix.
    pub fn path(self) -> &'static str {
        match self {
            Operation::Queue => "progress/admin/queue",
            Operation::Runtime => "monitoring/runtime",
            Operation::Alerts => "alerts",
            Operation::Pause => "automation/rollout/pause",
            Operation::Resume => "automation/rollout/active",
        }
    }
}
