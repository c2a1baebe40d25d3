// Raise the default stack size on Windows so deep temp-tree traversal
// (size accounting, permission repair) never overflows, tests included.

fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_env = std::env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default();

    if target_os == "windows" {
        if target_env == "msvc" {
            println!("cargo:rustc-link-arg=/STACK:8388608");
            println!("cargo:rustc-link-arg-bins=/STACK:8388608");
            println!("cargo:rustc-link-arg-tests=/STACK:8388608");
        } else if target_env == "gnu" {
            println!("cargo:rustc-link-arg=-Wl,--stack,8388608");
            println!("cargo:rustc-link-arg-bins=-Wl,--stack,8388608");
            println!("cargo:rustc-link-arg-tests=-Wl,--stack,8388608");
        }
    }
}
