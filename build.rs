//! Build script for the dogsitter-client crate.
//!
//! Loads API endpoint configuration at compile time so `ApiConfig::from_env()`
//! can read it through `option_env!()`.
//!
//! Priority order:
//! 1. Environment variables already set (e.g., from CI/CD, system env)
//! 2. Variables from `.env` file (if it exists)
//! 3. Variables from `.env.example` file (fallback for CI builds)

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-changed=.env.example");
    println!("cargo:rerun-if-env-changed=DOGSITTER_API_URL");
    println!("cargo:rerun-if-env-changed=DOGSITTER_MEDIA_URL");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let crate_root = PathBuf::from(&manifest_dir);
    let env_file = crate_root.join(".env");
    let env_example_file = crate_root.join(".env.example");

    let known_vars = ["DOGSITTER_API_URL", "DOGSITTER_MEDIA_URL"];
    let env_vars_set = known_vars
        .iter()
        .filter(|&var| env::var(var).is_ok())
        .count();

    let file_to_load = if env_file.exists() {
        Some(env_file)
    } else if env_vars_set == 0 && env_example_file.exists() {
        Some(env_example_file)
    } else {
        None
    };

    let Some(file_path) = file_to_load else {
        return;
    };

    let contents = fs::read_to_string(&file_path).expect("Failed to read env file");

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();

            // Only the API variables are forwarded; an explicit environment wins.
            if known_vars.contains(&key) && env::var(key).is_err() {
                println!("cargo:rustc-env={}={}", key, value);
            }
        }
    }
}
