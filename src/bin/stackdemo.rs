use std::process;
use std::hint::black_box;
use clap::{Command, Arg, ArgMatches};

use errstack::{traced, TracedError, Verb, StackTrace};
use errstack::{BacktraceResolver, CachingResolver, SymbolResolver};

fn main() {
    env_logger::init();

    let app = Command::new("stackdemo")
        .version(clap::crate_version!())
        .about("Capture a call stack through a chain of nested calls and print it")
        .arg(
            Arg::new("levels")
            .short('n')
            .long("levels")
            .help("Number of nested calls to make before capturing")
            .value_name("N")
            .takes_value(true)
            .default_value("3")
        )
        .arg(
            Arg::new("verb")
            .short('f')
            .long("verb")
            .help("Frame verb: s (file), d (line), n (name) or v (file:line)")
            .value_name("VERB")
            .takes_value(true)
            .default_value("v")
        )
        .arg(
            Arg::new("detailed")
            .short('p')
            .long("plus")
            .help("Use the detailed form of the verb")
        )
        .arg(
            Arg::new("marshal")
            .short('m')
            .long("marshal")
            .help("Print each frame on a single line, as text-marshalled")
        )
        .arg(
            Arg::new("error")
            .short('e')
            .long("error")
            .help("Print the captured error with its stack instead of the bare trace")
        )
        .arg(
            Arg::new("cache")
            .short('c')
            .long("cache")
            .help("Memoize symbol lookups by address")
        )
        .arg(
            Arg::new("repeat")
            .short('r')
            .long("repeat")
            .help("Render the trace this many times")
            .value_name("COUNT")
            .takes_value(true)
            .default_value("1")
        );

    let args = app.get_matches();

    if args.is_present("cache") {
        if let Err(error) = errstack::install_resolver(CachingResolver::new(BacktraceResolver)) {
            log::warn!("{}", error);
        }
    }

    let levels = parse_count(&args, "levels");
    let repeat = parse_count(&args, "repeat");

    let error = descend(levels);
    let trace = error.stack_trace();
    log::info!("captured {} frames after {} nested calls", trace.len(), levels);

    for _ in 0..repeat {
        print_trace(&args, &error, &trace);
    }
}

fn parse_count(args: &ArgMatches, name: &str) -> usize {
    let value = args.value_of(name).unwrap_or("0");
    match value.parse() {
        Ok(count) => count,
        Err(error) => {
            eprintln!("invalid value for --{}: '{}': {}", name, value, error);
            process::exit(2);
        }
    }
}

fn print_trace(args: &ArgMatches, error: &TracedError, trace: &StackTrace) {
    let resolver: &dyn SymbolResolver = errstack::default_resolver();

    if args.is_present("error") {
        println!("{:?}", error);
        return;
    }

    if args.is_present("marshal") {
        for frame in trace.iter() {
            println!("{}", frame.marshal_text_with(resolver));
        }
        return;
    }

    let verb = args.value_of("verb")
        .and_then(|verb| verb.chars().next())
        .and_then(Verb::from_char);

    let verb = match verb {
        Some(verb) => verb,
        None => {
            eprintln!("unrecognised verb, expected one of s, d, n or v");
            process::exit(2);
        }
    };

    println!("{}", trace.render(resolver, verb, args.is_present("detailed")));
}

#[inline(never)]
fn descend(levels: usize) -> TracedError {
    if levels == 0 {
        return traced!("reached the bottom after descending");
    }
    let error = descend(levels - 1);
    let _ = black_box(levels);
    error
}
