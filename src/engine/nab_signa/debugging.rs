// Panics in debug builds. Release builds log the message as an error and carry on
#[macro_export]
macro_rules! debug_panic
{
    ($($arg:tt)*) =>
    {
        if cfg!(debug_assertions)
        {
            panic!($($arg)*)
        }
        else
        {
            $crate::log::error!($($arg)*)
        }
    }
}
