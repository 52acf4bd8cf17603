//! Plain-text screens for the terminal front end.

use std::fmt::Write;

use menneskesyn::domain::prompts::count_word;
use menneskesyn::domain::quiz::{QuizPhase, SessionSnapshot};

const HEADER: &str = "Menneskesyn & Selvledelse";
const BAR_WIDTH: usize = 20;

/// Renders the whole screen for a snapshot.
pub fn screen(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();

    match snapshot.part_label() {
        Some(label) => line(&mut out, format!("== {} ==  {}", HEADER, label)),
        None => line(&mut out, format!("== {} ==", HEADER)),
    }
    if let Some(error) = &snapshot.last_error {
        line(&mut out, format!("! {}  (skriv «lukk» for å skjule)", error));
    }
    line(&mut out, "");

    match snapshot.phase {
        QuizPhase::KeyEntry => {
            line(&mut out, "Lim inn API-nøkkelen for å starte:");
        }
        QuizPhase::Intro => {
            line(&mut out, "Velkommen til refleksjonsspillet");
            line(&mut out, "");
            line(
                &mut out,
                format!(
                    "Dette er et verktøy designet for erfarne ledere. Vi skal utforske {} dimensjoner \
                     av ditt menneskesyn, hvordan du ubevisst forstår mennesker.",
                    count_word(snapshot.total_dimensions)
                ),
            );
            line(&mut out, "Dette påvirker direkte hvordan du utøver selvledelse i hverdagen.");
            line(
                &mut out,
                "Husk: Det finnes ingen riktige eller gale svar. Dette er en øvelse i bevisstgjøring, ikke en test.",
            );
            line(&mut out, "");
            line(&mut out, "[Enter] Start Refleksjon");
        }
        QuizPhase::DimensionInput => {
            progress(&mut out, snapshot);
            if let Some(dimension) = &snapshot.current_dimension {
                line(&mut out, dimension.title());
                line(&mut out, "");
                line(
                    &mut out,
                    format!("1 = {}: {}", dimension.left_label(), dimension.left_description()),
                );
                line(
                    &mut out,
                    format!("5 = {}: {}", dimension.right_label(), dimension.right_description()),
                );
            }
            line(&mut out, "");
            line(&mut out, "Velg et tall fra 1 til 5:");
        }
        QuizPhase::FeedbackLoading | QuizPhase::SummaryLoading => {
            if snapshot.phase == QuizPhase::FeedbackLoading {
                progress(&mut out, snapshot);
            }
            if let Some(message) = snapshot.phase.loading_message() {
                line(&mut out, message);
            }
        }
        QuizPhase::FeedbackDisplay => {
            progress(&mut out, snapshot);
            line(&mut out, "Refleksjon");
            line(&mut out, "");
            line(&mut out, &snapshot.current_feedback);
            line(&mut out, "");
            if snapshot.dimension_index + 1 < snapshot.total_dimensions {
                line(&mut out, "[Enter] Neste Dimensjon →");
            } else {
                line(&mut out, "[Enter] Se Oppsummering →");
            }
        }
        QuizPhase::SummaryError => {
            line(&mut out, "[Enter] Prøv igjen    [restart] Start på nytt");
        }
        QuizPhase::SummaryDisplay => {
            line(&mut out, "Din Menneskesyn-profil");
            line(&mut out, "");
            line(&mut out, "Dine valg:");
            for answer in &snapshot.answers {
                line(&mut out, format!("  {}: {}", answer.title, answer.value));
            }
            line(&mut out, "");
            line(&mut out, &snapshot.final_summary);
            line(&mut out, "");
            line(&mut out, "Takk for at du gjennomførte refleksjonsspillet.");
            line(&mut out, "[restart] Start på nytt");
        }
    }

    out
}

fn progress(out: &mut String, snapshot: &SessionSnapshot) {
    if let Some(progress) = snapshot.progress {
        let filled = usize::from(progress.percent()) * BAR_WIDTH / 100;
        line(
            out,
            format!(
                "[{}{}] {}%",
                "#".repeat(filled),
                "-".repeat(BAR_WIDTH - filled),
                progress.percent()
            ),
        );
    }
}

fn line(out: &mut String, text: impl AsRef<str>) {
    let _ = writeln!(out, "{}", text.as_ref());
}
