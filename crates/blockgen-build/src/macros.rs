//! Build-script helpers.
//!
//! `build!` runs a full pass from `build.rs` and must be called inside a
//! function returning `Result<_, E>` where `E: From<blockgen_build::Error>`.
//! `start!` pulls the generated adapters and providers into the module it
//! is invoked from.

#[macro_export]
macro_rules! build {
    () => {
        //
        // CARGO
        //

        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rerun-if-changed=src");
        println!("cargo:rerun-if-changed=blockgen.toml");
        for key in [
            $crate::config::ENV_BASE_PACKAGE,
            $crate::config::ENV_MODULE_NAME,
            $crate::config::ENV_RUNTIME_CRATE,
            $crate::config::ENV_PLATFORM_SUPPORT,
        ] {
            println!("cargo:rerun-if-env-changed={key}");
        }

        //
        // GENERATE
        //

        $crate::build_script()?;
    };
}

#[macro_export]
macro_rules! start {
    () => {
        include!(concat!(env!("OUT_DIR"), "/blockgen.rs"));
    };
}
