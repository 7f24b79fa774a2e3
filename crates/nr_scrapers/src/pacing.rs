use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nr_core::{NoPacing, Pace, Pacer};
use rand::Rng;

/// Delays applied between browser interactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingConfig {
    pub min_step: Duration,
    pub max_step: Duration,
    pub keystroke: Duration,
    pub settle: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_step: Duration::from_secs(1),
            max_step: Duration::from_secs(5),
            keystroke: Duration::from_millis(100),
            settle: Duration::from_secs(2),
        }
    }
}

impl PacingConfig {
    pub fn into_pacer(self, enabled: bool) -> Arc<dyn Pacer> {
        if enabled {
            Arc::new(RandomPacer::new(self))
        } else {
            Arc::new(NoPacing)
        }
    }
}

/// Waits a random step delay between interactions and fixed delays for
/// keystrokes and result reloads.
#[derive(Debug, Clone, Default)]
pub struct RandomPacer {
    config: PacingConfig,
}

impl RandomPacer {
    pub fn new(config: PacingConfig) -> Self {
        Self { config }
    }

    pub fn delay_for(&self, pace: Pace) -> Duration {
        match pace {
            Pace::Step => {
                let min = self.config.min_step.as_millis() as u64;
                let max = self.config.max_step.as_millis() as u64;
                let (low, high) = if min <= max { (min, max) } else { (max, min) };
                Duration::from_millis(rand::thread_rng().gen_range(low..=high))
            }
            Pace::Keystroke => self.config.keystroke,
            Pace::Settle => self.config.settle,
        }
    }
}

#[async_trait]
impl Pacer for RandomPacer {
    async fn pause(&self, pace: Pace) {
        let delay = self.delay_for(pace);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
