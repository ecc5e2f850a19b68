use crate::Label;

/// One recognized gesture and the filename tokens that identify it.
///
/// Training and test data were recorded under different naming conventions,
/// so each definition carries one token set per namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureDefinition {
    pub output_label: Label,
    pub train_tokens: &'static [&'static str],
    pub test_tokens: &'static [&'static str],
}

const fn gesture(
    output_label: Label,
    train_tokens: &'static [&'static str],
    test_tokens: &'static [&'static str],
) -> GestureDefinition {
    GestureDefinition {
        output_label,
        train_tokens,
        test_tokens,
    }
}

/// The full catalog, in lookup order. Index `i` has output label `i`.
///
/// "DecereaseFanSpeed" is a misspelling that occurs in the test data.
pub static GESTURES: [GestureDefinition; 17] = [
    gesture(0, &["Num0"], &["0"]),
    gesture(1, &["Num1"], &["1"]),
    gesture(2, &["Num2"], &["2"]),
    gesture(3, &["Num3"], &["3"]),
    gesture(4, &["Num4"], &["4"]),
    gesture(5, &["Num5"], &["5"]),
    gesture(6, &["Num6"], &["6"]),
    gesture(7, &["Num7"], &["7"]),
    gesture(8, &["Num8"], &["8"]),
    gesture(9, &["Num9"], &["9"]),
    gesture(10, &["FanDown"], &["DecreaseFanSpeed", "DecereaseFanSpeed"]),
    gesture(11, &["FanOff"], &["FanOff"]),
    gesture(12, &["FanOn"], &["FanOn"]),
    gesture(13, &["FanUp"], &["IncreaseFanSpeed"]),
    gesture(14, &["LightOff"], &["LightOff"]),
    gesture(15, &["LightOn"], &["LightOn"]),
    gesture(16, &["SetThermo"], &["SetThermo"]),
];

/// Look up a training token. Exact match, first definition in catalog order wins.
pub fn resolve_train(token: &str) -> Option<&'static GestureDefinition> {
    GESTURES
        .iter()
        .find(|g| g.train_tokens.iter().any(|&t| t == token))
}

/// Look up a test token. Exact match, first definition in catalog order wins.
pub fn resolve_test(token: &str) -> Option<&'static GestureDefinition> {
    GESTURES
        .iter()
        .find(|g| g.test_tokens.iter().any(|&t| t == token))
}
