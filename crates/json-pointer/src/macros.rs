/// Parses a pointer literal, panicking if it is not valid RFC 6901 text.
#[macro_export]
macro_rules! json_pointer {
    ($path:expr) => {
        match <$crate::JsonPointer as ::std::str::FromStr>::from_str($path) {
            Ok(pointer) => pointer,
            Err(err) => panic!("invalid json pointer `{}`: {}", $path, err),
        }
    };
}
