use std::collections::HashMap;

use train_herald::{
    DeliveryError, IterationMetrics, Notifier, OutgoingMessage, PngChartRenderer, TrainingObserver,
};

/// Prints each report instead of sending it.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn send(&mut self, message: &OutgoingMessage) -> Result<(), DeliveryError> {
        println!("── {} ──", message.subject);
        for (id, image) in &message.inline_images {
            println!("   inline {id}: {} bytes of {}", image.bytes.len(), image.content_type);
        }
        Ok(())
    }
}

fn main() {
    let epochs = 8;
    let mut observer = TrainingObserver::new(PngChartRenderer::default(), ConsoleNotifier);

    if let Err(e) = observer.on_start(epochs, "demo") {
        eprintln!("start report failed: {e}");
    }

    for epoch in 0..epochs {
        observer.on_iteration_begin(epoch).expect("observer is running");

        // Stand-in for a real training step reporting callback-style logs.
        let t = epoch as f64;
        let logs: HashMap<String, f64> = [
            ("loss", 1.0 / (1.0 + t)),
            ("accuracy", 0.5 + 0.05 * t),
            ("val_loss", 1.1 / (1.0 + t)),
            ("val_accuracy", 0.48 + 0.05 * t),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        match observer.on_iteration_end(epoch, &IterationMetrics::from_logs(&logs)) {
            Ok(trigger) if trigger.is_due() => println!("epoch {epoch}: {trigger}"),
            Ok(_) => {}
            Err(e) => eprintln!("epoch {epoch}: report failed: {e}"),
        }
    }

    if let Err(e) = observer.on_end() {
        eprintln!("final report failed: {e}");
    }
}
