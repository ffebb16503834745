/// Wire field name of a mapping tag: the part before the first `,`.
///
/// `"name,omitempty"` maps to `"name"`. Returns `None` when the tag names no
/// field, e.g. `""` or `",omitempty"`.
pub fn wire_name(tag: &str) -> Option<&str> {
    let name = tag.split(',').next().unwrap_or_default();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
