//! Prompt templates for the generation service.
//!
//! Both prompts are deterministic: the same inputs always produce the same
//! text. They share one system instruction that fixes tone and constraints.

use std::fmt::Write;

use crate::domain::catalog::Dimension;
use crate::domain::foundation::LikertValue;

/// System instruction sent alongside every generation request.
pub const SYSTEM_INSTRUCTION: &str = r#"Du er en samtalepartner i et kort refleksjonsspill om menneskesyn og selvledelse.
Målgruppen er erfarne prosjektledere, teamledere og mellomledere i arbeidslivet.

Oppgave:
- Hjelp brukeren å plassere seg selv på menneskesyn-dimensjonene i spillet.
- Gi korte, konkrete tilbakemeldinger på hvert valg.
- Koble alt til selvledelse i jobb- og hverdagsliv.
- Dette er IKKE en test eller diagnose, bare en refleksjonsøvelse.

Språk og stil:
- Skriv på norsk.
- Bruk "du"-form.
- Vær profesjonell, tydelig og vennlig, ikke coachy eller terapeutisk.
- Ikke gi psykologiske diagnoser, og ikke gi råd om behandling.
- Hold fokus på arbeidshverdag, selvledelse, valg og refleksjon."#;

/// Builds the prompt asking for feedback on a single self-placement.
pub fn dimension_feedback_prompt(dimension: &Dimension, value: LikertValue) -> String {
    format!(
        r#"Brukeren har vurdert seg selv på dimensjonen: {title}.
Skalaen er 1-5.
1 = {left} ({left_desc})
5 = {right} ({right_desc})

Brukerens svar: {value}

Gi en kort tilbakemelding på 3–5 setninger som inneholder:
 - Én mulig styrke ved å ligge der på skalaen i en lederrolle.
 - Én mulig utfordring eller fallgruve for selvledelse.
 - Et refleksjonsspørsmål (f.eks "Hvordan merker du dette i jobbhverdagen din?").

Hold det kort og konsist."#,
        title = dimension.title(),
        left = dimension.left_label(),
        left_desc = dimension.left_description(),
        right = dimension.right_label(),
        right_desc = dimension.right_description(),
        value = value,
    )
}

/// Builds the prompt asking for a synthesis across every answered dimension.
///
/// Answers are listed in the order given, which callers keep in catalog order.
pub fn final_summary_prompt(answers: &[(&Dimension, LikertValue)]) -> String {
    let mut listing = String::new();
    for (dimension, value) in answers {
        // Writing to a String cannot fail.
        let _ = writeln!(
            listing,
            "- {}: Svarte {} (1={}, 5={})",
            dimension.title(),
            value,
            dimension.left_label(),
            dimension.right_label()
        );
    }

    format!(
        r#"Brukeren har nå fullført alle {count} dimensjonene. Her er svarene:
{listing}
Oppsummer overordnet i 5–7 setninger:
 - Hvilken tendens ser du i svarene?
 - Hvordan kan dette støtte god selvledelse?
 - Hvilke mulige blindsoner kan brukeren være litt oppmerksom på?

Avslutt med 1–2 refleksjonsspørsmål knyttet til selvledelse."#,
        count = count_word(answers.len()),
        listing = listing,
    )
}

/// Norwegian count word for small numbers; digits from seven upwards.
pub fn count_word(count: usize) -> String {
    match count {
        1 => "én".to_string(),
        2 => "to".to_string(),
        3 => "tre".to_string(),
        4 => "fire".to_string(),
        5 => "fem".to_string(),
        6 => "seks".to_string(),
        n => n.to_string(),
    }
}
