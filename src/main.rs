/// luamod - Lua module host CLI
use luamod::{LoadOptions, ModuleManifest, ScriptContext};
use mlua::{Lua, MultiValue, Value};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("luamod v{}", VERSION);
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    luamod [OPTIONS] [SCRIPT]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -h, --help              Print this help message");
    eprintln!("    -v, --version           Print version information");
    eprintln!("    -m, --manifest <FILE>   Register modules listed in a luamod.toml");
    eprintln!("    --module <NAME=FILE>    Register FILE as module NAME (repeatable)");
    eprintln!("    --reload <NAME=FILE>    After SCRIPT runs, hot-reload NAME from FILE (repeatable)");
    eprintln!();
    eprintln!("ARGUMENTS:");
    eprintln!("    [SCRIPT]                Entry Lua script (use '-' for stdin)");
    eprintln!();
    eprintln!("ENVIRONMENT:");
    eprintln!("    RUST_LOG                Log filter (default: warn)");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    luamod --module mathutils=mathutils.lua main.lua");
    eprintln!("    luamod -m luamod.toml main.lua --reload mathutils=mathutils_v2.lua");
    eprintln!("    echo \"print(require('mathutils').add(2, 3))\" | luamod -m luamod.toml -");
}

fn print_version() {
    println!("luamod {}", VERSION);
}

struct Options {
    manifest: Option<String>,
    modules: Vec<(String, String)>,
    reloads: Vec<(String, String)>,
    script: Option<String>,
}

fn parse_binding(flag: &str, value: Option<&String>) -> Result<(String, String), String> {
    let value = value.ok_or_else(|| format!("Missing NAME=FILE after {}", flag))?;
    match value.split_once('=') {
        Some((name, file)) if !name.is_empty() && !file.is_empty() => {
            Ok((name.to_string(), file.to_string()))
        }
        _ => Err(format!("Expected NAME=FILE after {}, got '{}'", flag, value)),
    }
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();

    let mut manifest = None;
    let mut modules = Vec::new();
    let mut reloads = Vec::new();
    let mut script = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                process::exit(0);
            }
            "-m" | "--manifest" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| "Missing manifest file after --manifest".to_string())?;
                manifest = Some(path.clone());
            }
            flag @ "--module" => {
                i += 1;
                modules.push(parse_binding(flag, args.get(i))?);
            }
            flag @ "--reload" => {
                i += 1;
                reloads.push(parse_binding(flag, args.get(i))?);
            }
            arg if arg.starts_with('-') && arg != "-" => {
                return Err(format!("Unknown option: {}", arg));
            }
            arg => {
                if script.is_some() {
                    return Err("Multiple scripts specified".to_string());
                }
                script = Some(arg.to_string());
            }
        }
        i += 1;
    }

    if script.is_none() && !reloads.is_empty() {
        return Err("--reload requires an entry script".to_string());
    }

    Ok(Options {
        manifest,
        modules,
        reloads,
        script,
    })
}

fn read_source(input: &str) -> Result<Vec<u8>, String> {
    if input == "-" {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else {
        let path = Path::new(input);
        if !path.exists() {
            return Err(format!("Input file not found: {}", input));
        }
        fs::read(path).map_err(|e| format!("Failed to read file '{}': {}", input, e))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", s.to_string_lossy()),
        other => other.type_name().to_string(),
    }
}

fn format_results(results: &MultiValue) -> String {
    let formatted: Vec<String> = results.iter().map(format_value).collect();
    format!("[{}]", formatted.join(", "))
}

fn build_context(options: &Options) -> Result<ScriptContext, String> {
    let context = match &options.manifest {
        Some(path) => {
            let manifest = ModuleManifest::load(Path::new(path)).map_err(|e| e.to_string())?;
            ScriptContext::from_manifest(&manifest).map_err(|e| e.to_string())?
        }
        None => ScriptContext::new(LoadOptions::default()),
    };

    for (name, file) in &options.modules {
        let source = read_source(file)?;
        context.add_module(name, &source, None);
    }
    Ok(context)
}

fn run(options: &Options) -> Result<(), String> {
    let context = build_context(options)?;

    let lua = Lua::new();
    if !context.attach(&lua).map_err(|e| e.to_string())? {
        eprintln!("Warning: module searcher not installed");
    }

    let Some(script) = &options.script else {
        for name in context.store().read().names() {
            println!("{}", name);
        }
        return Ok(());
    };

    let source = read_source(script)?;
    let chunk_name = if script == "-" { "stdin" } else { script.as_str() };
    let chunk = luamod::load_script(&lua, &source, chunk_name).map_err(|e| e.to_string())?;
    let results: MultiValue = chunk.call(()).map_err(|e| format!("Runtime error: {}", e))?;
    if !results.is_empty() {
        println!("{}", format_results(&results));
    }

    for (name, file) in &options.reloads {
        let source = read_source(file)?;
        context
            .reload_module_by_name(&lua, name, &source)
            .map_err(|e| format!("Reload of '{}' failed: {}", name, e))?;
        println!("reloaded {}", name);
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let options = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
