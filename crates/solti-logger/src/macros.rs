//! Leveled logging entry points.
//!
//! Every macro takes one of two shapes:
//! - formatted: a format string with arguments, `info!("listening on {}", addr)`;
//! - plain: a single displayable value, `warn!(err)`.
//!
//! `tracing` field syntax (`info!(user = %name, "login")`) is forwarded untouched.

#[macro_export]
macro_rules! trace {
    ($fmt:literal $($rest:tt)*) => { $crate::__private::tracing::trace!($fmt $($rest)*) };
    ($msg:expr) => { $crate::__private::tracing::trace!("{}", $msg) };
    ($($arg:tt)+) => { $crate::__private::tracing::trace!($($arg)+) };
}

#[macro_export]
macro_rules! debug {
    ($fmt:literal $($rest:tt)*) => { $crate::__private::tracing::debug!($fmt $($rest)*) };
    ($msg:expr) => { $crate::__private::tracing::debug!("{}", $msg) };
    ($($arg:tt)+) => { $crate::__private::tracing::debug!($($arg)+) };
}

#[macro_export]
macro_rules! info {
    ($fmt:literal $($rest:tt)*) => { $crate::__private::tracing::info!($fmt $($rest)*) };
    ($msg:expr) => { $crate::__private::tracing::info!("{}", $msg) };
    ($($arg:tt)+) => { $crate::__private::tracing::info!($($arg)+) };
}

#[macro_export]
macro_rules! warn {
    ($fmt:literal $($rest:tt)*) => { $crate::__private::tracing::warn!($fmt $($rest)*) };
    ($msg:expr) => { $crate::__private::tracing::warn!("{}", $msg) };
    ($($arg:tt)+) => { $crate::__private::tracing::warn!($($arg)+) };
}

#[macro_export]
macro_rules! error {
    ($fmt:literal $($rest:tt)*) => { $crate::__private::tracing::error!($fmt $($rest)*) };
    ($msg:expr) => { $crate::__private::tracing::error!("{}", $msg) };
    ($($arg:tt)+) => { $crate::__private::tracing::error!($($arg)+) };
}

/// Logs at ERROR with `severity = "fatal"`, then exits the process with status 1.
///
/// The event is named `fatal`, so it still passes a `fatal` threshold.
#[macro_export]
macro_rules! fatal {
    ($fmt:literal $($rest:tt)*) => {{
        $crate::__private::tracing::error!(name: "fatal", severity = "fatal", $fmt $($rest)*);
        $crate::__private::exit()
    }};
    ($msg:expr) => {{
        $crate::__private::tracing::error!(name: "fatal", severity = "fatal", "{}", $msg);
        $crate::__private::exit()
    }};
    ($($arg:tt)+) => {{
        $crate::__private::tracing::error!(name: "fatal", severity = "fatal", $($arg)+);
        $crate::__private::exit()
    }};
}

/// Logs at ERROR with `severity = "panic"`, then panics with the same message.
///
/// Leading `key = value` fields (`%` and `?` sigils included) are logged too:
/// `log_panic!(user = %name, "denied {}", path)` panics with the formatted part only.
#[macro_export]
macro_rules! log_panic {
    (@split [$($field:tt)*] $fmt:literal $($rest:tt)*) => {{
        let message = ::std::format!($fmt $($rest)*);
        $crate::__private::tracing::error!(
            name: "panic",
            severity = "panic",
            $($field)*
            "{}",
            message
        );
        ::std::panic!("{}", message)
    }};
    (@split [$($field:tt)*] $key:ident = $value:expr , $($tail:tt)*) => {
        $crate::log_panic!(@split [$($field)* $key = $value,] $($tail)*)
    };
    (@split [$($field:tt)*] $key:ident = % $value:expr , $($tail:tt)*) => {
        $crate::log_panic!(@split [$($field)* $key = %$value,] $($tail)*)
    };
    (@split [$($field:tt)*] $key:ident = ? $value:expr , $($tail:tt)*) => {
        $crate::log_panic!(@split [$($field)* $key = ?$value,] $($tail)*)
    };
    ($fmt:literal $($rest:tt)*) => {
        $crate::log_panic!(@split [] $fmt $($rest)*)
    };
    ($key:ident = $($rest:tt)+) => {
        $crate::log_panic!(@split [] $key = $($rest)+)
    };
    ($msg:expr) => {{
        let message = ::std::string::ToString::to_string(&$msg);
        $crate::__private::tracing::error!(name: "panic", severity = "panic", "{}", message);
        ::std::panic!("{}", message)
    }};
}
