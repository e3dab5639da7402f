//! Fixed names and values shared across the crate.

/// Environment variable set by the engine package's activation script.
pub const ROOT_OVERRIDE_VAR: &str = "HEAVYDB_ROOT_PATH";

/// Subdirectory of the override root holding the engine library.
pub const ROOT_OVERRIDE_SUBPATH: &str = "lib";

pub const DEFAULT_PACKAGE_NAME: &str = "heavydbe";
pub const DEFAULT_PACKAGE_VERSION: &str = "0.1";
pub const DEFAULT_MODULE_NAME: &str = "heavydbe";
pub const DEFAULT_LANGUAGE: &str = "c++17";
pub const DEFAULT_CONFIG_FILE: &str = "setup.toml";

pub const ENGINE_LIBRARY: &str = "DBEngine";
pub const BOOST_SYSTEM_LIBRARY: &str = "boost_system";

pub const STD_FLAG: &str = "-std=c++17";
pub const RAPIDJSON_STDSTRING_FLAG: &str = "-DRAPIDJSON_HAS_STDSTRING";

pub const RAPIDJSON_INCLUDE_SUBPATH: &str = "ThirdParty/rapidjson";
pub const OS_INCLUDE_SUBPATH: &str = "Distributed/os";

/// Runtime search marker resolving two directories above the loaded module (ELF).
pub const ORIGIN_MARKER: &str = "$ORIGIN/../../";

/// Runtime search marker resolving two directories above the loaded module (Mach-O).
pub const LOADER_PATH_MARKER: &str = "@loader_path/../../";

pub const OBJ_HASH_PREFIX_LEN: usize = 20;
