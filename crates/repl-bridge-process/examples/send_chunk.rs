//! Send the chunk under the cursor of a small notebook to a real REPL.
//!
//! ```text
//! RUST_LOG=repl_bridge=debug cargo run -p repl-bridge-process --example send_chunk -- python
//! ```

use repl_bridge::{
    BridgeSettings, ContextId, DispatchOptions, EditorHost, MemoryEditor, RegionKind, ReplBridge,
};
use repl_bridge_process::TerminalHost;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const NOTEBOOK: &str = "\
# Demo

```{python}
def square(x):
    return x * x

print(square(7))
```

```{python}
print('second chunk')
```
";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let language = std::env::args().nth(1).unwrap_or_else(|| "python".to_string());
    let settings = BridgeSettings {
        language,
        ..BridgeSettings::default()
    };
    let config = match settings.validate() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid settings: {}", err);
            std::process::exit(2);
        }
    };

    let mut bridge = ReplBridge::new(config, TerminalHost::new());
    let mut editor = MemoryEditor::new(ContextId::new(1), NOTEBOOK);
    editor.set_cursor(4, 0);

    let sent = bridge.dispatch(&mut editor, RegionKind::Chunk, DispatchOptions::default());
    println!("sent={} cursor_line={}", sent, editor.cursor().line);
    for (level, message) in editor.messages() {
        println!("[{:?}] {}", level, message);
    }

    // Give the interpreter a moment to answer.
    thread::sleep(Duration::from_millis(500));

    let context = editor.context_id();
    let Some(view) = bridge.sessions().session(context).map(|s| *s.handle()) else {
        return;
    };
    if let Some(output) = bridge.sessions_mut().processes_mut().view_output(view) {
        println!("--- {} ({} rows) ---", view, output.len());
        for row in output.rows() {
            println!("{}", row);
        }
    }
}
