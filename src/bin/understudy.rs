//! CLI wrapper for the understudy bundle loader.
//!
//! Usage:
//!   understudy <bundle-file>        # Load a bundle file and report
//!   understudy -e "code"            # Load inline bundle text
//!   understudy --tree <file|code>   # Dump the parser token tree
//!   understudy                      # Interactive shell
//!
//! Log output follows the RUST_LOG environment variable.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::rc::Rc;

use uuid::Uuid;

use understudy::parser::parse_to_token_tree;
use understudy::runner::ds::element::Element;
use understudy::runner::ds::object::ObjectHandle;
use understudy::runner::ds::value::Value;
use understudy::runner::loader::{
    ComponentHandle, ComponentRegistry, EventPayload, EventTopic,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,bundle=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => {
            run_shell();
        }
        2 => {
            let arg = &args[1];
            if arg == "-h" || arg == "--help" {
                print_usage();
                process::exit(0);
            }
            run_file(arg);
        }
        3 if args[1] == "-e" || args[1] == "--eval" => {
            run_inline(&args[2]);
        }
        3 if args[1] == "--tree" => {
            dump_tree(&args[2]);
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("understudy - dynamic component registry & bundle loader");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  understudy <bundle-file>        Load a bundle file and report");
    eprintln!("  understudy -e \"code\"            Load inline bundle text");
    eprintln!("  understudy --tree <file|code>   Dump the parser token tree");
    eprintln!("  understudy                      Interactive shell");
}

/// A fresh registry seeded the way a host application would: a couple of
/// boot-time defaults plus event printers.
fn demo_registry() -> ComponentRegistry {
    let registry = ComponentRegistry::new();
    for name in ["Home", "Settings"] {
        registry.register_default_component(
            name,
            ComponentHandle::native(move |_props| {
                Ok(Rc::new(Element::new(
                    "view",
                    vec![("screen".to_string(), Value::str(name))],
                    vec![Value::str("built-in placeholder")],
                )))
            }),
        );
    }
    subscribe_printers(&registry);
    registry
}

fn subscribe_printers(registry: &ComponentRegistry) {
    let topics = [
        EventTopic::ComponentsUpdated,
        EventTopic::BundleExecuted,
        EventTopic::BundleExecutionError,
        EventTopic::SessionCleared,
    ];
    for topic in topics {
        registry.events().subscribe(topic, move |payload| {
            println!("[event] {}: {}", topic, describe_payload(payload));
        });
    }
}

fn describe_payload(payload: &EventPayload) -> String {
    match payload {
        EventPayload::ComponentsUpdated {
            total_components,
            session_components,
        } => format!(
            "{} components ({} session-owned)",
            total_components, session_components
        ),
        EventPayload::BundleExecuted {
            session_id,
            component_count,
        } => format!("session '{}', {} components", session_id, component_count),
        EventPayload::BundleExecutionError {
            session_id,
            message,
        } => format!("session '{}': {}", session_id, message),
        EventPayload::SessionCleared { session_id } => match session_id {
            Some(id) => format!("session '{}'", id),
            None => "no session was active".to_string(),
        },
    }
}

fn fresh_session_id() -> String {
    format!("session-{}", Uuid::new_v4())
}

/// Load bundle text into the registry and print the outcome. Returns
/// whether the load succeeded.
fn load_and_report(registry: &ComponentRegistry, source: &str) -> bool {
    match registry.load_session_bundle(source, &fresh_session_id()) {
        Ok(summary) => {
            println!(
                "Loaded session '{}': {} components, {} services, app: {}, navigation: {}",
                summary.id,
                summary.component_count,
                summary.service_count,
                summary.has_app,
                summary.has_navigation
            );
            print_listing(registry);
            true
        }
        Err(e) => {
            eprintln!("Load failed: {}", e);
            false
        }
    }
}

fn print_listing(registry: &ComponentRegistry) {
    let listings = registry.list_components();
    if listings.is_empty() {
        println!("(no components registered)");
        return;
    }
    println!("Components:");
    for listing in listings {
        let tier = if listing.session { "session" } else { "default" };
        println!("  {:<20} [{}]", listing.name, tier);
    }
}

fn print_stats(registry: &ComponentRegistry) {
    let stats = registry.stats();
    println!("total components:   {}", stats.total_components);
    println!("session components: {}", stats.session_components);
    println!(
        "session id:         {}",
        stats.session_id.as_deref().unwrap_or("-")
    );
    match stats.last_update_time {
        Some(t) => println!("last update:        {}", t.to_rfc3339()),
        None => println!("last update:        -"),
    }
}

fn render_component(registry: &ComponentRegistry, name: &str) {
    let handle = match registry.get_component(name) {
        Some(handle) => handle,
        None => {
            eprintln!("No component named '{}'", name);
            return;
        }
    };
    let props = Value::Object(ObjectHandle::new());
    match handle.render(&props) {
        Ok(tree) => println!("{}", tree),
        Err(e) => eprintln!("Render error: {}", e),
    }
}

fn run_file(filename: &str) {
    let source = match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            process::exit(1);
        }
    };
    let registry = demo_registry();
    if !load_and_report(&registry, &source) {
        process::exit(1);
    }
}

fn run_inline(code: &str) {
    let registry = demo_registry();
    if !load_and_report(&registry, code) {
        process::exit(1);
    }
}

fn dump_tree(arg: &str) {
    let source = if Path::new(arg).exists() {
        match fs::read_to_string(arg) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", arg, e);
                process::exit(1);
            }
        }
    } else {
        arg.to_string()
    };
    match parse_to_token_tree(&source) {
        Ok(tree) => println!("{}", tree),
        Err(e) => {
            eprintln!("Parse error: {}", e);
            process::exit(1);
        }
    }
}

fn run_shell() {
    println!("understudy v0.1.0 - bundle loader shell");
    println!("Commands: :load <file>, :list, :render <name>, :clear, :stats, :quit");
    println!("Anything else is executed as inline bundle text.");
    println!();

    let registry = demo_registry();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("understudy> ");
        stdout.flush().unwrap();

        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (command, rest) = match input.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match command {
            ":quit" | ":exit" => break,
            ":load" => {
                if rest.is_empty() {
                    eprintln!("Usage: :load <file>");
                    continue;
                }
                match fs::read_to_string(rest) {
                    Ok(source) => {
                        load_and_report(&registry, &source);
                    }
                    Err(e) => eprintln!("Error reading file '{}': {}", rest, e),
                }
            }
            ":list" => print_listing(&registry),
            ":render" => {
                if rest.is_empty() {
                    eprintln!("Usage: :render <name>");
                    continue;
                }
                render_component(&registry, rest);
            }
            ":clear" => registry.clear_session_components(),
            ":stats" => print_stats(&registry),
            _ if command.starts_with(':') => {
                eprintln!("Unknown command '{}'", command);
                eprintln!("Commands: :load <file>, :list, :render <name>, :clear, :stats, :quit");
            }
            _ => {
                load_and_report(&registry, input);
            }
        }
    }

    println!("Goodbye!");
}
