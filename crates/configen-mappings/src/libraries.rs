//! Third-party library id → CMake package descriptor.

/// How a third-party library id from a configuration document maps onto a
/// CMake `find_package()` call and its result variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryMapping {
    /// CMake package name, `None` when the library is intentionally
    /// unsupported (bundled, replaced, or out of scope for the migration).
    pub package: Option<&'static str>,
    /// Result variable when it differs from the package name
    /// (e.g. `find_package(Freetype)` reports through `FREETYPE_FOUND`).
    pub result_variable: Option<&'static str>,
    /// Whether the found flag is `<result>_FOUND` or the bare result
    /// variable.
    pub append_found_suffix: bool,
    /// Fixed guard for the `find_package()` call, when one platform is the
    /// only sensible host for the library.
    pub emit_if: Option<&'static str>,
}

impl LibraryMapping {
    const fn package(package: &'static str) -> Self {
        Self {
            package: Some(package),
            result_variable: None,
            append_found_suffix: true,
            emit_if: None,
        }
    }

    const fn with_result(package: &'static str, result: &'static str) -> Self {
        Self {
            package: Some(package),
            result_variable: Some(result),
            append_found_suffix: true,
            emit_if: None,
        }
    }

    /// The result variable already is the found signal (no `_FOUND` suffix).
    const fn with_bare_result(package: &'static str, result: &'static str) -> Self {
        Self {
            package: Some(package),
            result_variable: Some(result),
            append_found_suffix: false,
            emit_if: None,
        }
    }

    const fn guarded(package: &'static str, emit_if: &'static str) -> Self {
        Self {
            package: Some(package),
            result_variable: None,
            append_found_suffix: true,
            emit_if: Some(emit_if),
        }
    }

    const fn masked() -> Self {
        Self {
            package: None,
            result_variable: None,
            append_found_suffix: false,
            emit_if: None,
        }
    }

    /// Symbol the emitter deduplicates on: the result variable when set,
    /// otherwise the package name.
    pub fn target_name(&self) -> Option<&'static str> {
        self.result_variable.or(self.package)
    }

    /// The generated found-flag symbol for condition substitution
    /// (`libs.zlib` → `ZLIB_FOUND`). `None` for masked entries.
    pub fn found_flag(&self) -> Option<String> {
        let base = self.result_variable.or(self.package)?;
        if self.append_found_suffix {
            Some(format!("{base}_FOUND"))
        } else {
            Some(base.to_string())
        }
    }
}

/// Look up the package descriptor for a library id.
///
/// Returns `None` for ids missing from the table (a diagnostic-worthy gap,
/// unlike a masked entry which is a deliberate skip).
pub fn find_library_mapping(id: &str) -> Option<LibraryMapping> {
    let mapping = match id {
        // === Compression ===
        "zlib" => LibraryMapping::with_result("ZLIB", "ZLIB"),
        "zstd" => LibraryMapping::package("ZSTD"),
        "lzma" => LibraryMapping::with_result("LibLZMA", "LIBLZMA"),

        // === Images ===
        "libpng" => LibraryMapping::with_result("PNG", "PNG"),
        "libjpeg" => LibraryMapping::with_result("JPEG", "JPEG"),
        "tiff" => LibraryMapping::with_result("TIFF", "TIFF"),

        // === Text rendering ===
        "freetype" => LibraryMapping::with_result("Freetype", "FREETYPE"),
        "harfbuzz" => LibraryMapping::package("harfbuzz"),
        "fontconfig" => LibraryMapping::with_result("Fontconfig", "FONTCONFIG"),

        // === Text handling ===
        "pcre2" => LibraryMapping::package("PCRE2"),
        "icu" => LibraryMapping::package("ICU"),
        "iconv" => LibraryMapping::package("Iconv"),

        // === Crypto / database ===
        "openssl" => LibraryMapping::with_result("OpenSSL", "OPENSSL"),
        "openssl_headers" => LibraryMapping::with_bare_result("OpenSSL", "OPENSSL_INCLUDE_DIR"),
        "sqlite3" => LibraryMapping::package("SQLite3"),

        // === System services ===
        "pthread" => LibraryMapping::with_result("Threads", "Threads"),
        "glib" => LibraryMapping::package("GLIB2"),
        "dbus" => LibraryMapping::package("DBus1"),
        "libudev" => LibraryMapping::guarded("Libudev", "config.linux"),
        "journald" => LibraryMapping::guarded("Libsystemd", "config.linux"),
        "libproxy" => LibraryMapping::package("Libproxy"),
        "cups" => LibraryMapping::with_result("Cups", "CUPS"),

        // === Graphics stacks ===
        "opengl" => LibraryMapping::with_result("OpenGL", "OPENGL"),
        "gbm" => LibraryMapping::package("gbm"),
        "egl" => LibraryMapping::package("EGL"),
        "vulkan" => LibraryMapping::with_result("Vulkan", "Vulkan"),
        "xlib" => LibraryMapping::with_result("X11", "X11"),
        "xcb" => LibraryMapping::package("XCB"),
        "xcb_xlib" => LibraryMapping::with_result("X11_XCB", "X11_XCB"),
        "wayland_client" => LibraryMapping::package("Wayland"),
        "wayland_cursor" => LibraryMapping::package("Wayland"),
        "libinput" => LibraryMapping::guarded("Libinput", "config.linux"),
        "drm" => LibraryMapping::package("Libdrm"),

        // === Bundled or replaced: intentionally unsupported ===
        "doubleconversion" => LibraryMapping::masked(),
        "libatomic" => LibraryMapping::masked(),
        "zstd_private" => LibraryMapping::masked(),

        _ => return None,
    };
    Some(mapping)
}
