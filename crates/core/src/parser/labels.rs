//! Argument label binding from selector names

use crate::model::{Method, TypeForest};

/// Labels of a selector such as `foo(_:bar:)`, `_` included
pub fn selector_labels(selector_name: &str) -> Vec<&str> {
    let Some(open) = selector_name.find('(') else {
        return Vec::new();
    };
    let inner = selector_name[open + 1..]
        .strip_suffix(')')
        .unwrap_or(&selector_name[open + 1..]);
    let mut labels: Vec<&str> = inner.split(':').collect();
    // trailing `:` leaves an empty last element
    if labels.last().is_some_and(|l| l.is_empty()) {
        labels.pop();
    }
    labels
}

/// Give each collected parameter the external label at its position
pub fn bind_argument_labels(method: &mut Method) {
    let labels = selector_labels(&method.selector_name);
    for (parameter, label) in method.parameters.iter_mut().zip(labels) {
        parameter.argument_label = match label {
            "_" => None,
            label => Some(label.to_string()),
        };
    }
}

/// Bind labels for every method in the forest
pub fn bind_all(forest: &mut TypeForest) {
    for method in forest.methods_mut() {
        bind_argument_labels(method);
    }
}
