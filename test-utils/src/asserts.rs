use std::{fmt::Display, sync::LazyLock};

const SKIP_STRING_CHECKS_ENV_VAR: &str = "ANTELOPE_SKIP_STRING_ERROR_CHECKS";

static SKIP_STRING_CHECKS: LazyLock<bool> =
    LazyLock::new(|| std::env::var_os(SKIP_STRING_CHECKS_ENV_VAR).is_some());

pub trait ResultAssertsExt {
    /// Asserts that the result is an error whose message contains `to_contain`.
    fn assert_err_contains(&self, to_contain: impl AsRef<str>);
}

impl<T, E> ResultAssertsExt for Result<T, E>
where
    E: Display,
{
    #[track_caller]
    fn assert_err_contains(&self, to_contain: impl AsRef<str>) {
        let to_contain = to_contain.as_ref();
        let Err(e) = self else {
            panic!("expected an error containing `{to_contain}`, got Ok");
        };
        if *SKIP_STRING_CHECKS {
            eprintln!(
                "WARNING: error message checks are disabled by `{SKIP_STRING_CHECKS_ENV_VAR}`"
            );
            return;
        }
        let message = e.to_string();
        assert!(
            message.contains(to_contain),
            "error message `{message}` should have contained `{to_contain}`"
        );
    }
}
