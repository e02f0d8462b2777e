use std::fs;

use cachesim::{
    cache::Cache,
    config::CacheConfig,
    event::{AccessEvent, Op},
    trace::Trace,
};

fn main() {
    let mut args = pico_args::Arguments::from_env();
    let heartbeat_int: u64 = args
        .opt_value_from_str("-h")
        .expect("-h should be an integer")
        .unwrap_or(0);
    let verbose = args.contains("-v");

    let config_str: String = if let Some(config_str) = args.opt_value_from_str("--config").unwrap()
    {
        config_str
    } else {
        let config_path: String = args
            .opt_value_from_str("-p")
            .unwrap()
            .expect("Must provide a config with --config <json> or -p <path>");
        fs::read_to_string(config_path).expect("Could not find config file")
    };
    let config: CacheConfig = serde_json::from_str(&config_str).unwrap();
    let mut cache = Cache::new(&config).unwrap_or_else(|err| panic!("Bad geometry: {}", err));
    if verbose {
        cache.set_observer(print_access);
    }
    println!(
        "tag/index/offset bits: {}/{}/{}",
        cache.tag_bits(),
        cache.index_bits(),
        cache.offset_bits()
    );

    let trace_path: String = args
        .opt_value_from_str("-t")
        .unwrap()
        .expect("Must provide a trace with -t");
    let records_per_block: usize = args
        .opt_value_from_str("--buffer-size")
        .expect("--buffer-size must be an integer")
        .unwrap_or(1024 * 16);
    let blocks_per_queue: usize = args
        .opt_value_from_str("--queue-size")
        .expect("--queue-size must be an integer")
        .unwrap_or(32);
    let stats_path: Option<String> = args.opt_value_from_str("--json").unwrap();

    let trace = Trace::read(trace_path.into(), records_per_block, blocks_per_queue).unwrap();

    let mut next_heartbeat = heartbeat_int;
    while let Ok(block) = trace.rec.recv() {
        for access in &block {
            cache.access(access.addr, access.op);
        }
        if heartbeat_int != 0 && cache.stats().total_accesses > next_heartbeat {
            println!("Accesses: {}", cache.stats().total_accesses);
            while next_heartbeat < cache.stats().total_accesses {
                next_heartbeat += heartbeat_int;
            }
        }
    }
    println!("Ran {} accesses", cache.stats().total_accesses);

    let report = cache.stats().report();
    match stats_path {
        Some(path) => {
            let stats_file = fs::File::create(path).expect("Cannot open output file");
            serde_json::to_writer_pretty(stats_file, &report).unwrap();
        }
        None => println!("{}", serde_json::to_string_pretty(&report).unwrap()),
    }
}

fn print_access(event: &AccessEvent) {
    let op = match event.op {
        Op::Read => "read ",
        Op::Write => "write",
    };
    let outcome = if event.hit { "hit " } else { "miss" };
    println!(
        "{} {} tag=0x{:x} set={} offset={} (way {})",
        op, outcome, event.tag, event.index, event.offset, event.line.way
    );
}
