pub const IMPROVE_INSTRUCTION: &str = include_str!("../data/prompts/improve_instruction.txt");

/// Prefix the user's idea with the improvement instruction.
///
/// The idea is passed through untouched; only a single space separates it
/// from the instruction.
pub fn build_improvement_input(idea: &str) -> String {
    format!("{} {}", IMPROVE_INSTRUCTION.trim_end(), idea)
}
