//! level-gen: seeded TANKFIELD level generator and level checker.
//!
//! Usage:
//!   level-gen generate --seed 42 --output assets/level.json
//!   level-gen check --input assets/level.json

use std::path::PathBuf;
use std::process;

use tankfield_core::enums::CellCode;
use tankfield_core::level::TileCoord;
use tankfield_procgen::{generate_level, LevelGenConfig};
use tankfield_sim::level::{load_level_file, Grid};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "generate" => cmd_generate(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "level-gen: TANKFIELD level tool\n\
         \n\
         Commands:\n\
         \n\
         generate  Scatter walls and destructibles over an empty grid\n\
         \n\
           --seed <N>           RNG seed (default: 42)\n\
           --size <C>x<R>       Grid columns x rows (default: 50x50)\n\
           --walls <N>          Wall count (default: 50)\n\
           --destructibles <N>  Destructible count (default: 25)\n\
           --output <path>      Output JSON path (default: level.json)\n\
         \n\
         check     Validate a level file and print its contents\n\
         \n\
           --input <path>       Level JSON path\n\
         \n\
         Examples:\n\
         \n\
           level-gen generate --seed 7 --output assets/level.json\n\
           level-gen check --input assets/level.json\n"
    );
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|pair| pair[0] == flag)
        .map(|pair| pair[1].as_str())
}

fn parse_count(args: &[String], flag: &str, default: usize) -> usize {
    match flag_value(args, flag) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Error: {flag} expects a number, got `{raw}`");
            process::exit(1);
        }),
        None => default,
    }
}

fn parse_size(args: &[String], default: (usize, usize)) -> (usize, usize) {
    let Some(raw) = flag_value(args, "--size") else {
        return default;
    };
    let parsed = raw
        .split_once('x')
        .and_then(|(c, r)| Some((c.parse().ok()?, r.parse().ok()?)));
    match parsed {
        Some((columns, rows)) if columns > 0 && rows > 0 => (columns, rows),
        _ => {
            eprintln!("Error: --size expects <columns>x<rows>, got `{raw}`");
            process::exit(1);
        }
    }
}

// --- Generate command ---

fn cmd_generate(args: &[String]) {
    let defaults = LevelGenConfig::default();
    let seed = flag_value(args, "--seed")
        .map(|raw| {
            raw.parse::<u64>().unwrap_or_else(|_| {
                eprintln!("Error: --seed expects a number, got `{raw}`");
                process::exit(1);
            })
        })
        .unwrap_or(defaults.seed);
    let (columns, rows) = parse_size(args, (defaults.columns, defaults.rows));
    let output = flag_value(args, "--output")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("level.json"));

    let config = LevelGenConfig {
        seed,
        columns,
        rows,
        walls: parse_count(args, "--walls", defaults.walls),
        destructibles: parse_count(args, "--destructibles", defaults.destructibles),
        keep_clear: defaults
            .keep_clear
            .into_iter()
            .filter(|c| c.row < rows && c.col < columns)
            .collect(),
    };

    eprintln!("Generating {columns}×{rows} level with seed {seed}...");
    let level = generate_level(&config);

    let json = match serde_json::to_string(&level) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing level: {e}");
            process::exit(1);
        }
    };
    match std::fs::write(&output, json) {
        Ok(()) => eprintln!("Done! Output: {}", output.display()),
        Err(e) => {
            eprintln!("Error writing {}: {e}", output.display());
            process::exit(1);
        }
    }
}

// --- Check command ---

fn cmd_check(args: &[String]) {
    let Some(input) = flag_value(args, "--input").map(PathBuf::from) else {
        eprintln!("Error: --input <path> is required");
        process::exit(1);
    };

    let grid = match load_level_file(&input, None) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Invalid level {}: {e}", input.display());
            process::exit(1);
        }
    };

    let (walls, destructibles) = count_cells(&grid);
    println!(
        "{}: {}×{} grid, {walls} walls, {destructibles} destructibles",
        input.display(),
        grid.columns(),
        grid.rows(),
    );
    for row in 0..grid.rows() {
        let line: String = (0..grid.columns())
            .map(|col| match grid.cell(TileCoord::new(row, col)) {
                Some(CellCode::Wall) => '#',
                Some(CellCode::Destructible) => '%',
                _ => '.',
            })
            .collect();
        println!("{line}");
    }
}

fn count_cells(grid: &Grid) -> (usize, usize) {
    grid.iter().fold((0, 0), |(walls, hay), (_, cell)| match cell {
        CellCode::Wall => (walls + 1, hay),
        CellCode::Destructible => (walls, hay + 1),
        CellCode::Empty => (walls, hay),
    })
}
