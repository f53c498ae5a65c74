/// Benchmark runner for the bundle loader pipeline.
///
/// Times the parse stage and the full sandboxed execution separately for a
/// set of representative bundles, then component renders through the
/// registry.

extern crate understudy;

use std::rc::Rc;
use std::time::{Duration, Instant};

use understudy::parser::parse_to_ast;
use understudy::runner::ds::value::Value;
use understudy::runner::host::HostModuleMap;
use understudy::runner::loader::{BundleExecutor, ComponentRegistry};

/// Time the parse stage alone.
fn run_parse(name: &str, code: &str, iterations: u32) -> Duration {
    parse_to_ast(code).unwrap_or_else(|e| panic!("benchmark '{}' failed to parse: {}", name, e));

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = parse_to_ast(code);
    }
    start.elapsed()
}

/// Time a full execution: parse, sandbox run, exports decode.
fn run_execute(name: &str, code: &str, iterations: u32) -> Duration {
    let executor = BundleExecutor::new(Rc::new(HostModuleMap::standard()));
    executor
        .execute(code)
        .unwrap_or_else(|e| panic!("benchmark '{}' failed to execute: {}", name, e));

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = executor.execute(code);
    }
    start.elapsed()
}

/// Time repeated renders of one loaded screen component.
fn run_render(iterations: u32) -> Duration {
    let registry = ComponentRegistry::new();
    registry
        .load_session_bundle(BUNDLE_SCREENS, "bench-render")
        .expect("render benchmark bundle loads");
    let home = registry.get_component("Home").expect("Home component");

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = home.render(&Value::Undefined);
    }
    start.elapsed()
}

// ============================================================================
// Benchmark bundles
// ============================================================================

const BUNDLE_MINIMAL: &str = "exports.screens = {};";

const BUNDLE_SCREENS: &str = r#"
exports.screens = {
    Home: function (props) {
        return UI.view({ id: 'home' }, UI.text('Welcome'), UI.button({ label: 'Go' }));
    },
    About: function (props) { return UI.text('About'); },
    Settings: function (props) {
        return UI.list([UI.text('a'), UI.text('b'), UI.text('c')]);
    },
    Profile: function (props) { return UI.view(UI.image({ src: 'avatar.png' })); },
    Search: function (props) { return UI.input({ placeholder: 'query' }); },
    Feed: function (props) { return UI.list([]); }
};
"#;

const BUNDLE_CLASS: &str = r#"
var cls = require('lang/class');
function Card(props) {
    cls.classCallCheck(this, Card);
    this.title = props && props.title ? props.title : 'card';
}
cls.createClass(Card, {
    render: function () { return UI.view(UI.text(this.title)); }
});
function FeaturedCard(props) {
    cls.classCallCheck(this, FeaturedCard);
    Card.call(this, props);
}
cls.inherits(FeaturedCard, Card);
exports.screens = { Card: Card, Featured: FeaturedCard };
"#;

const BUNDLE_COMPUTE: &str = r#"
var fib = function (n) {
    var a = 0;
    var b = 1;
    for (var i = 0; i < n; i++) {
        var t = a;
        a = b;
        b = t + b;
    }
    return a;
};
var sum = 0;
for (var i = 0; i < 5000; i++) {
    sum += i;
}
exports.services = { fib20: fib(20), sum: sum };
"#;

const BUNDLE_NAVIGATION: &str = r#"
exports.navigation = {
    initial: 'home',
    routes: [
        { name: 'home', screen: 'Home', title: 'Home' },
        { name: 'about', screen: 'About', title: 'About' },
        { name: 'settings', screen: 'Settings' }
    ]
};
exports.screens = {
    Home: function (props) { return UI.view(); },
    About: function (props) { return UI.view(); },
    Settings: function (props) { return UI.view(); }
};
"#;

fn main() {
    println!("=======================================================");
    println!("  understudy - Bundle Loader Benchmarks");
    println!("  Parse vs Full Sandbox Execution");
    println!("=======================================================\n");

    let benchmarks: Vec<(&str, &str, u32)> = vec![
        ("Minimal bundle", BUNDLE_MINIMAL, 2000),
        ("Six screens", BUNDLE_SCREENS, 500),
        ("Class shims", BUNDLE_CLASS, 500),
        ("Compute heavy", BUNDLE_COMPUTE, 50),
        ("Navigation table", BUNDLE_NAVIGATION, 500),
    ];

    println!(
        "{:<24} {:>14} {:>14} {:>10}",
        "Bundle", "Parse", "Execute", "Exec/Parse"
    );
    println!("{}", "-".repeat(66));

    let mut total_parse = Duration::ZERO;
    let mut total_exec = Duration::ZERO;

    for (name, code, iterations) in &benchmarks {
        let parse_dur = run_parse(name, code, *iterations);
        let exec_dur = run_execute(name, code, *iterations);
        total_parse += parse_dur;
        total_exec += exec_dur;

        let ratio = exec_dur.as_secs_f64() / parse_dur.as_secs_f64();
        println!(
            "{:<24} {:>12.2?} {:>12.2?} {:>9.2}x",
            name, parse_dur, exec_dur, ratio
        );
    }

    println!("{}", "-".repeat(66));
    let total_ratio = total_exec.as_secs_f64() / total_parse.as_secs_f64();
    println!(
        "{:<24} {:>12.2?} {:>12.2?} {:>9.2}x",
        "TOTAL", total_parse, total_exec, total_ratio
    );

    let render_iterations = 2000;
    let render_dur = run_render(render_iterations);
    println!("\nComponent render x{}: {:.2?}", render_iterations, render_dur);

    println!("\n=======================================================");
    println!("  Correctness Verification");
    println!("=======================================================\n");

    let verifications: Vec<(&str, &str, usize)> = vec![
        ("Minimal bundle", BUNDLE_MINIMAL, 0),
        ("Six screens", BUNDLE_SCREENS, 6),
        ("Class shims", BUNDLE_CLASS, 2),
        ("Navigation table", BUNDLE_NAVIGATION, 3),
    ];

    println!("{:<24} {:>10} {:>10} {:>4}", "Bundle", "Expected", "Loaded", "");
    println!("{}", "-".repeat(52));

    for (name, code, expected) in verifications {
        let registry = ComponentRegistry::new();
        match registry.load_session_bundle(code, "bench") {
            Ok(summary) => {
                let status = if summary.component_count == expected {
                    "✓"
                } else {
                    "✗"
                };
                println!(
                    "{:<24} {:>10} {:>10} {:>4}",
                    name, expected, summary.component_count, status
                );
            }
            Err(_) => println!("{:<24} {:>10} {:>10} {:>4}", name, expected, "error", "✗"),
        }
    }

    let registry = ComponentRegistry::new();
    registry
        .load_session_bundle(BUNDLE_COMPUTE, "verify")
        .expect("compute bundle loads");

    let service_checks: Vec<(&str, &str, i64)> = vec![
        ("fib20", "fib(20)", 6765),
        ("sum", "sum(<5000)", 12_497_500),
    ];
    for (key, label, expected) in service_checks {
        let got = registry.get_service(key);
        let rendered = match &got {
            Some(v) => v.to_log_string(),
            None => "missing".to_string(),
        };
        let ok = matches!(&got, Some(v) if *v == Value::int(expected));
        println!(
            "{:<24} {:>10} {:>10} {:>4}",
            label,
            expected,
            rendered,
            if ok { "✓" } else { "✗" }
        );
    }
}
