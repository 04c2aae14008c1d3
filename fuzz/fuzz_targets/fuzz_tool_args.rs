#![no_main]
use libfuzzer_sys::fuzz_target;
use toolchat::agent::parse_command;
use toolchat::sessions::{ConversationStore, InMemoryConversationStore, Role};
use toolchat::tools::{default_registry, ToolContext};

// Every tool must answer any argument string without panicking.
fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let registry = default_registry();
    let store = InMemoryConversationStore::with_max_history(4);
    store.append("fuzz", Role::User, input);
    let ctx = ToolContext {
        session_id: "fuzz",
        store: &store,
    };

    let (command, args) = parse_command(input);
    if let Some(tool) = registry.lookup(&command) {
        let _ = tool.execute(args, &ctx);
    }

    for token in registry.tokens() {
        if let Some(tool) = registry.lookup(token) {
            let _ = tool.execute(input, &ctx);
        }
    }
});
