// Arena Gate - Build Task Runner
// cargo xtask pattern; everything runs against the workspace root

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use xshell::{Shell, cmd};

fn main() -> Result<()> {
    let sh = Shell::new()?;
    let args: Vec<_> = std::env::args().skip(1).collect();

    match args.first().map(|s| s.as_str()) {
        Some("build") => build(&sh, args.iter().any(|a| a == "--release")),
        Some("test") => test(&sh),
        Some("format") => format(&sh, args.iter().any(|a| a == "--check")),
        Some("clippy") => clippy(&sh),
        Some("run") => run(&sh, &args[1..]),
        Some("ci") => ci(&sh),
        Some("dist") => dist(&sh),
        Some(other) => {
            print_help();
            bail!("unknown command: {}", other)
        },
        None => {
            print_help();
            Ok(())
        },
    }
}

fn print_help() {
    println!("Arena Gate - Build Commands:");
    println!();
    println!("Usage: cargo xtask <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  build [--release]   Build the gate binary");
    println!("  test                Run all tests");
    println!("  format [--check]    Format code (check mode doesn't modify)");
    println!("  clippy              Run clippy checks");
    println!("  run [ARGS...]       Run the gate (args go to arena-gate)");
    println!("  ci                  format --check + clippy + test");
    println!("  dist                Release build packaged with a default config");
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    let _dir = sh.push_dir(project_root());
    println!("🦀 Building arena-gate{}...", if release { " (release)" } else { "" });

    if release {
        cmd!(sh, "cargo build --release -p arena-gate")
            .run()
            .context("Failed to build arena-gate in release mode")?;
    } else {
        cmd!(sh, "cargo build -p arena-gate").run().context("Failed to build arena-gate")?;
    }

    println!("✅ Build complete");
    Ok(())
}

fn test(sh: &Shell) -> Result<()> {
    let _dir = sh.push_dir(project_root());
    println!("🧪 Running tests...");

    cmd!(sh, "cargo test --workspace").run().context("Tests failed")?;

    println!("✅ All tests passed!");
    Ok(())
}

fn format(sh: &Shell, check: bool) -> Result<()> {
    let _dir = sh.push_dir(project_root());

    if check {
        cmd!(sh, "cargo fmt --all -- --check").run().context("Rust code is not formatted")?;
        println!("✅ Rust code is properly formatted");
    } else {
        cmd!(sh, "cargo fmt --all").run().context("Failed to format Rust code")?;
        println!("✅ Rust code formatted");
    }

    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    let _dir = sh.push_dir(project_root());

    cmd!(sh, "cargo clippy --workspace --all-targets -- --deny warnings --allow clippy::uninlined-format-args")
        .run()
        .context("Clippy checks failed")?;

    Ok(())
}

fn run(sh: &Shell, args: &[String]) -> Result<()> {
    let _dir = sh.push_dir(project_root());
    println!("▶️  Starting arena-gate...");

    cmd!(sh, "cargo run -p arena-gate -- {args...}")
        .run()
        .context("Failed to run arena-gate")?;

    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("📝 [1/3] Checking code format...");
    format(sh, true)?;

    println!("🔍 [2/3] Running clippy checks...");
    clippy(sh)?;

    println!("🧪 [3/3] Running tests...");
    test(sh)?;

    println!("🎉 CI pipeline completed successfully!");
    Ok(())
}

/// Release binary plus conf/config.toml in build/dist, then a tarball.
fn dist(sh: &Shell) -> Result<()> {
    build(sh, true)?;

    let project = project_root();
    let dist_dir = project.join("build/dist");
    sh.create_dir(dist_dir.join("bin"))?;
    sh.create_dir(dist_dir.join("conf"))?;
    sh.create_dir(dist_dir.join("logs"))?;

    let binary_src = project.join("target/release/arena-gate");
    sh.copy_file(&binary_src, dist_dir.join("bin/arena-gate"))
        .context("Failed to copy binary")?;
    write_default_config(&dist_dir)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let package_name = format!("arena-gate-{}.tar.gz", timestamp);

    let _dir = sh.push_dir(&dist_dir);
    cmd!(sh, "tar czf {package_name} bin conf logs")
        .run()
        .context("Failed to create tarball")?;

    println!("✅ Distribution package created: {}", dist_dir.join(&package_name).display());
    Ok(())
}

fn write_default_config(dist_dir: &Path) -> Result<()> {
    let config_content = r#"[server]
host = "0.0.0.0"
port = 8080

[logging]
level = "info,arena_gate=debug"
file = "logs/arena-gate.log"

[i18n]
locales = ["en", "fr", "es", "de", "pt-BR"]
default_locale = "en"

[gate]
protected_paths = ["/dashboard", "/profile", "/settings", "/billing", "/training"]
excluded_paths = ["/api", "/auth/callback", "/_next", "/static"]
provider_failure = "closed"

# Leave url/anon_key empty to run without sign-in (protected paths become public)
[identity]
url = ""
anon_key = ""
access_cookie = "sb-access-token"
refresh_cookie = "sb-refresh-token"
timeout_secs = "5s"
"#;

    std::fs::write(dist_dir.join("conf/config.toml"), config_content)
        .context("Failed to create config file")?;
    Ok(())
}

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
