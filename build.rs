fn main() {
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=FREENETIX_BUILD_DATE={}", build_date);

    #[cfg(feature = "desktop")]
    tauri_build::build();
}
