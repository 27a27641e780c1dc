fn main() {
    // Release pipelines stamp the binary through these; local builds keep placeholders.
    let commit = std::env::var("GITHUB_MCP_COMMIT")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "commit".to_string());
    let date = std::env::var("GITHUB_MCP_BUILD_DATE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "date".to_string());

    println!("cargo:rustc-env=GHMCP_BUILD_COMMIT={}", commit.trim());
    println!("cargo:rustc-env=GHMCP_BUILD_DATE={}", date.trim());
    println!("cargo:rerun-if-env-changed=GITHUB_MCP_COMMIT");
    println!("cargo:rerun-if-env-changed=GITHUB_MCP_BUILD_DATE");
}
