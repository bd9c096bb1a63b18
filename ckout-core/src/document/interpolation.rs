//! `%(name)s` expansion of option values.

use crate::error::InterpolationErrorKind;

/// Maximum nesting of references before expansion gives up.
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Expands `%(name)s` references in `value`; `%%` yields a literal `%`.
///
/// `lookup` receives lower-cased option names and returns their raw values.
/// Values pulled in through a reference are expanded recursively.
pub fn interpolate<'a, F>(value: &str, lookup: F) -> Result<String, InterpolationErrorKind>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut accum = String::with_capacity(value.len());
    interpolate_into(&mut accum, value, &lookup, 1)?;
    Ok(accum)
}

fn interpolate_into<'a, F>(
    accum: &mut String,
    mut rest: &str,
    lookup: &F,
    depth: usize,
) -> Result<(), InterpolationErrorKind>
where
    F: Fn(&str) -> Option<&'a str>,
{
    if depth > MAX_INTERPOLATION_DEPTH {
        return Err(InterpolationErrorKind::Depth);
    }

    while !rest.is_empty() {
        let Some(p) = rest.find('%') else {
            accum.push_str(rest);
            return Ok(());
        };
        accum.push_str(&rest[..p]);
        rest = &rest[p..];

        if let Some(tail) = rest.strip_prefix("%%") {
            accum.push('%');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("%(") {
            let reference = tail
                .find(")s")
                .map(|end| &tail[..end])
                .filter(|name| !name.is_empty() && !name.contains(')'))
                .ok_or_else(|| {
                    InterpolationErrorKind::Syntax(format!(
                        "bad interpolation variable reference `{rest}`"
                    ))
                })?;
            rest = &tail[reference.len() + 2..];

            let key = reference.to_lowercase();
            let resolved = lookup(&key)
                .ok_or(InterpolationErrorKind::Missing { reference: key })?;
            if resolved.contains('%') {
                interpolate_into(accum, resolved, lookup, depth + 1)?;
            } else {
                accum.push_str(resolved);
            }
        } else {
            return Err(InterpolationErrorKind::Syntax(format!(
                "'%' must be followed by '%' or '(', found: `{rest}`"
            )));
        }
    }

    Ok(())
}
