//! Session statistics and metrics.

use std::time::Duration;

use dispatcher::DispatchMetricsSnapshot;

/// Statistics from a console session run
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// Total messages received from the stream
    pub messages_received: u64,

    /// Event-log entries visible at shutdown
    pub log_entries: u64,

    /// Flows visible at shutdown
    pub flows: u64,

    /// Total duration of the session
    pub duration: Duration,

    /// Action bus delivery counters
    pub dispatch: DispatchMetricsSnapshot,
}

impl SessionStats {
    /// Calculate messages per second throughput
    pub fn messages_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.messages_received as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Session Statistics ===\n");

        println!("Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Messages received: {}", self.messages_received);
        println!("   ├─ Messages/sec: {:.2}", self.messages_per_sec());
        println!("   ├─ Event-log entries: {}", self.log_entries);
        println!("   └─ Flows: {}", self.flows);

        println!("\nAction Bus");
        println!("   ├─ Actions dispatched: {}", self.dispatch.dispatched);
        println!("   ├─ View-origin: {}", self.dispatch.view_actions);
        println!("   ├─ Server-origin: {}", self.dispatch.server_actions);
        println!(
            "   └─ Subscriber errors: {}",
            self.dispatch.subscriber_errors
        );

        println!();
    }
}
