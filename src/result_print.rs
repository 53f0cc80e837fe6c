//! Print progress information and results of the synthesis, either nothing, an
//! aggregated summary, or full verbose traces.

use crate::preprocessing::gr1_tree::Gr1TreeNode;
use crate::preprocessing::specification::Specification;

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrintOptions {
    NoPrint,
    ShortPrint,
    FullPrint,
}

/// Print the given text, but only if the full print option is selected.
/// This simplifies the code regarding printing (no redundant if statements).
pub(crate) fn print_if_allowed(text: String, print_options: PrintOptions) {
    if print_options != PrintOptions::FullPrint {
        return;
    }
    println!("{text}")
}

/// Print the realizability verdict, colored green (realizable) or red (not).
pub fn print_verdict(realizable: bool) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if realizable { Color::Green } else { Color::Red };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    let text = if realizable { "Realizable." } else { "Not realizable." };
    let _ = writeln!(&mut stdout, "{text}");
    let _ = stdout.reset();
}

/// Echo the variables (with their indices) and the parsed formulas of a specification,
/// in the shape they will be interpreted by the engine.
pub fn echo_specification(spec: &Specification) {
    let mut var_index = 0;
    print!("Environment variables (indices): ");
    if spec.env_vars.is_empty() {
        print!("(none)");
    }
    for (i, name) in spec.env_vars.iter().enumerate() {
        let separator = if i + 1 == spec.env_vars.len() { "" } else { ", " };
        print!("{name} ({var_index}){separator}");
        var_index += 1;
    }
    println!();

    print!("System variables (indices): ");
    if spec.sys_vars.is_empty() {
        print!("(none)");
    }
    for (i, name) in spec.sys_vars.iter().enumerate() {
        let separator = if i + 1 == spec.sys_vars.len() { "" } else { ", " };
        print!("{name} ({var_index}){separator}");
        var_index += 1;
    }
    println!();
    println!();

    println!("ENV INIT:  {}", spec.env_init);
    println!("SYS INIT:  {}", spec.sys_init);

    let trans = |conjuncts: &[Gr1TreeNode]| {
        if conjuncts.is_empty() {
            "(none)".to_string()
        } else {
            conjuncts
                .iter()
                .map(|c| format!("[] {c}"))
                .collect::<Vec<_>>()
                .join(" & ")
        }
    };
    println!("ENV TRANS:  {}", trans(&spec.env_trans));
    println!("SYS TRANS:  {}", trans(&spec.sys_trans));

    let goals = |conjuncts: &[Gr1TreeNode]| {
        if conjuncts.is_empty() {
            "(none)".to_string()
        } else {
            conjuncts
                .iter()
                .map(|c| format!("[]<> {c}"))
                .collect::<Vec<_>>()
                .join(" & ")
        }
    };
    println!("ENV GOALS:  {}", goals(&spec.env_goals));
    println!("SYS GOALS:  {}", goals(&spec.sys_goals));
}
