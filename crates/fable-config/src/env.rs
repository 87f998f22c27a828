use std::sync::OnceLock;

use regex::Regex;

/// Expand `${VAR}` placeholders in a raw TOML string
///
/// Supports a shell-style fallback via `${VAR:-default}`. When a fallback is
/// provided and the variable is unset, the fallback is substituted instead of
/// returning an error. Lines starting with `#` (TOML comments) are passed
/// through unchanged.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn re() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        // Group 1: the variable name
        // Group 2: optional fallback after `:-`
        RE.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("must be valid regex")
        })
    }

    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        // Skip expansion for comment lines
        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut result = String::with_capacity(line.len());
        let mut last_end = 0;

        for captures in re().captures_iter(line) {
            let overall = captures.get(0).expect("regex always has a full match");
            let var_name = captures.get(1).expect("regex group 1 is not optional").as_str();
            let fallback = captures.get(2).map(|m| m.as_str());

            result.push_str(&line[last_end..overall.start()]);

            match std::env::var(var_name) {
                Ok(value) => result.push_str(&value),
                Err(_) => match fallback {
                    Some(fallback) => result.push_str(fallback),
                    None => {
                        return Err(format!("environment variable not found: `{var_name}`"));
                    }
                },
            }

            last_end = overall.end();
        }

        result.push_str(&line[last_end..]);
        output.push_str(&result);
    }

    // Preserve trailing newline if present
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}
