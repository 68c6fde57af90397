//! Platform/config token → CMake predicate symbol.

/// Map a `config.*` token from a condition expression to the CMake variable
/// that answers the same question at configure time.
///
/// Returns `None` for tokens with no CMake counterpart; the caller records
/// those as unresolved.
pub fn platform_predicate(token: &str) -> Option<&'static str> {
    let predicate = match token {
        // === Operating systems ===
        "win32" | "windows" => "WIN32",
        "unix" => "UNIX",
        "linux" => "LINUX",
        "android" => "ANDROID",
        "darwin" | "apple" => "APPLE",
        "macos" | "osx" => "MACOS",
        "ios" => "IOS",
        "tvos" => "TVOS",
        "watchos" => "WATCHOS",
        "qnx" => "QNX",
        "freebsd" => "FREEBSD",
        "netbsd" => "NETBSD",
        "openbsd" => "OPENBSD",
        "solaris" => "SOLARIS",
        "hurd" => "HURD",
        "vxworks" => "VXWORKS",
        "integrity" => "INTEGRITY",
        "wasm" | "emscripten" => "EMSCRIPTEN",

        // === Toolchains ===
        "msvc" => "MSVC",
        "mingw" => "MINGW",
        "gcc" => "CMAKE_COMPILER_IS_GNUCXX",
        "clang" => "CLANG",
        "icc" => "ICC",

        _ => return None,
    };
    Some(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_common_platforms() {
        assert_eq!(platform_predicate("win32"), Some("WIN32"));
        assert_eq!(platform_predicate("linux"), Some("LINUX"));
        assert_eq!(platform_predicate("darwin"), Some("APPLE"));
    }

    #[test]
    fn unknown_token_is_none() {
        assert_eq!(platform_predicate("beos"), None);
    }
}
