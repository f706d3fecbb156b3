//! Log macros shared by the library and the firmware.
//!
//! - `defmt` feature: forwards to `defmt` (the firmware picks the transport)
//! - host tests: prints with a level prefix
//! - anything else: arguments are type-checked and dropped

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", not(test)))]
        ::defmt::info!($($arg)*);
        #[cfg(test)]
        println!("[INFO] {}", format_args!($($arg)*));
        #[cfg(not(any(feature = "defmt", test)))]
        let _ = format_args!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", not(test)))]
        ::defmt::warn!($($arg)*);
        #[cfg(test)]
        println!("[WARN] {}", format_args!($($arg)*));
        #[cfg(not(any(feature = "defmt", test)))]
        let _ = format_args!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", not(test)))]
        ::defmt::error!($($arg)*);
        #[cfg(test)]
        eprintln!("[ERROR] {}", format_args!($($arg)*));
        #[cfg(not(any(feature = "defmt", test)))]
        let _ = format_args!($($arg)*);
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "defmt", not(test)))]
        ::defmt::debug!($($arg)*);
        #[cfg(test)]
        println!("[DEBUG] {}", format_args!($($arg)*));
        #[cfg(not(any(feature = "defmt", test)))]
        let _ = format_args!($($arg)*);
    }};
}
