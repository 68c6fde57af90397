//! Built-in override tables for reference resolution.
//!
//! These are deliberately plain data: the translator receives them at
//! construction so tests can substitute fixtures (see
//! [`ConditionTranslator::with_tables`](crate::ConditionTranslator::with_tables)).

use std::collections::BTreeMap;

/// Features whose enabled-flag symbol is not the derived `FEATURE_<sym>`
/// form. Keyed by the feature id as written in documents, before name
/// normalization.
pub fn builtin_feature_symbols() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        // The gbm feature is a thin wrapper around the library of the same
        // name; its condition is just "was the package found".
        ("gbm", "gbm_FOUND"),
        // system-* features picked the system copy in the legacy build;
        // the generated build always uses the system copy.
        ("system-xcb", "ON"),
        ("system-freetype", "ON"),
        ("system-pcre2", "ON"),
    ])
}

/// Test ids whose result symbol is fixed rather than derived from the
/// known-tests set.
pub fn builtin_test_symbols() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        // Language standard probes map onto compiler feature generator
        // expressions instead of compile tests.
        ("c++11", "$<COMPILE_FEATURES:cxx_std_11>"),
        ("c++14", "$<COMPILE_FEATURES:cxx_std_14>"),
        ("c++1z", "$<COMPILE_FEATURES:cxx_std_17>"),
        ("c99", "$<COMPILE_FEATURES:c_std_99>"),
        ("c11", "$<COMPILE_FEATURES:c_std_11>"),
        // TODO: run a real compile test here instead of assuming support.
        ("x86SimdAlways", "ON"),
        // x86 sub-architecture probes share the architecture test's results.
        ("aesni", "TEST_subarch_aes"),
        ("avx", "TEST_subarch_avx"),
        ("avx2", "TEST_subarch_avx2"),
        ("avx512f", "TEST_subarch_avx512f"),
        ("avx512cd", "TEST_subarch_avx512cd"),
        ("avx512dq", "TEST_subarch_avx512dq"),
        ("avx512bw", "TEST_subarch_avx512bw"),
        ("avx512er", "TEST_subarch_avx512er"),
        ("avx512pf", "TEST_subarch_avx512pf"),
        ("avx512vl", "TEST_subarch_avx512vl"),
        ("avx512ifma", "TEST_subarch_avx512ifma"),
        ("avx512vbmi", "TEST_subarch_avx512vbmi"),
        ("avx512vbmi2", "TEST_subarch_avx512vbmi2"),
        ("avx512vpopcntdq", "TEST_subarch_avx512vpopcntdq"),
        ("bmi", "TEST_subarch_bmi"),
        ("bmi2", "TEST_subarch_bmi2"),
        ("f16c", "TEST_subarch_f16c"),
        ("fma", "TEST_subarch_fma"),
        ("lzcnt", "TEST_subarch_lzcnt"),
        ("mmx", "TEST_subarch_mmx"),
        ("movbe", "TEST_subarch_movbe"),
        ("pclmul", "TEST_subarch_pclmul"),
        ("popcnt", "TEST_subarch_popcnt"),
        ("rdrnd", "TEST_subarch_rdseed"),
        ("rdseed", "TEST_subarch_rdseed"),
        ("shani", "TEST_subarch_sha"),
        ("sse2", "TEST_subarch_sse2"),
        ("sse3", "TEST_subarch_sse3"),
        ("ssse3", "TEST_subarch_ssse3"),
        ("sse4a", "TEST_subarch_sse4a"),
        ("sse4_1", "TEST_subarch_sse4_1"),
        ("sse4_2", "TEST_subarch_sse4_2"),
        ("xop", "TEST_subarch_xop"),
        // Non-x86 sub-architectures.
        ("neon", "TEST_subarch_neon"),
        ("crc32", "TEST_subarch_crc32"),
        ("dsp", "TEST_subarch_dsp"),
        ("dspr2", "TEST_subarch_dspr2"),
        ("altivec", "TEST_subarch_altivec"),
        ("spe", "TEST_subarch_spe"),
        ("vsx", "TEST_subarch_vsx"),
        // Platform probes with fixed results.
        ("posix-iconv", "TEST_posix_iconv"),
        ("sun-iconv", "TEST_sun_iconv"),
        ("openssl11", "(OPENSSL_VERSION VERSION_GREATER_EQUAL \"1.1.0\")"),
        ("reduce_exports", "CMAKE_CXX_COMPILE_OPTIONS_VISIBILITY"),
        ("xlib", "X11_FOUND"),
    ])
}
