//! Example: debounced input listener on real timers

use fos_native_event::{
    logging, AttachRequest, Element, Event, EventListener, LocalTimers, LogLevel, NativeEventConfig, NativeEvents,
};
use std::time::Duration;

fn main() {
    let config = NativeEventConfig::default().with_debug_log_level(LogLevel::Debug);
    logging::init(&config);

    let timers = LocalTimers::new();
    let events = NativeEvents::new(config, timers.clone());
    let input = Element::new("input");

    let listener = EventListener::function(|event: Event| {
        println!("search for {:?}", event.detail.unwrap_or_default());
    });
    let attached = events.attach(AttachRequest::new(&input, "input", listener).debounce_ms(150));
    let handle = match attached {
        Ok(Some(handle)) => handle,
        Ok(None) => return,
        Err(err) => {
            eprintln!("attach failed: {err}");
            return;
        }
    };

    timers.block_on(async {
        for typed in ["f", "fo", "fos", "fos e", "fos engine"] {
            input.dispatch_event(Event::new("input").with_detail(typed));
            smol::Timer::after(Duration::from_millis(40)).await;
        }
        smol::Timer::after(Duration::from_millis(200)).await;
    });

    handle.destroy();
    println!("listeners left: {}", input.listener_count("input"));
}
