/// Sorts a pair of values into nondescending order.
pub fn sort_pair<K: Ord>(a: K, b: K) -> (K, K) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Joins the labels of a product node into a single flat label.
pub fn join_labels(first: &str, second: &str) -> String {
    format!("{first},{second}")
}
