/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

// #[macro_export] is required to make macros works across crates
// but it always put the macro in the crate root.
// #[doc(hidden)] + "pub use" is a workaround to namespace a macro.
#[cfg(feature = "log")]
pub use log::{debug, error, info, log_enabled, trace, warn, Level};

#[cfg(not(feature = "log"))]
pub use crate::{
    __debug as debug, __error as error, __info as info, __log_enabled as log_enabled,
    __trace as trace, __warn as warn
};

#[cfg(not(feature = "log"))]
#[repr(usize)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Level {
    Error = 1,
    Warn,
    Info,
    Debug,
    Trace
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_enabled {
    ($lvl:expr) => {{
        let _ = $lvl;
        false
    }};
}

// the disabled macros still type-check their arguments so call sites
// don't collect unused variable warnings when logging is off
#[doc(hidden)]
#[macro_export]
macro_rules! __error {
    ($($arg:tt)+) => {{
        if false {
            let _ = ::std::format!($($arg)+);
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __warn {
    ($($arg:tt)+) => {{
        if false {
            let _ = ::std::format!($($arg)+);
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __info {
    ($($arg:tt)+) => {{
        if false {
            let _ = ::std::format!($($arg)+);
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __debug {
    ($($arg:tt)+) => {{
        if false {
            let _ = ::std::format!($($arg)+);
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __trace {
    ($($arg:tt)+) => {{
        if false {
            let _ = ::std::format!($($arg)+);
        }
    }};
}
