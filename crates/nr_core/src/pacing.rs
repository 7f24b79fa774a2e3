use async_trait::async_trait;

/// The kinds of deliberate waits inserted between browser interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pace {
    /// Between two interactive steps.
    Step,
    /// After each typed character.
    Keystroke,
    /// After a click that reloads results.
    Settle,
}

/// Decides how long to wait before the next browser interaction.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, pace: Pace);
}

/// Never waits. Used in tests and for local runs with `--no-pacing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait]
impl Pacer for NoPacing {
    async fn pause(&self, _pace: Pace) {}
}
