use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{AppState, CohortDimension};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Page identifiers
// ---------------------------------------------------------------------------

/// The dashboard's narrative pages, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Background,
    ProblemStatement,
    DataSets,
    Exploration,
    WorldView,
    Conclusions,
    Recommendations,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::Background,
        Page::ProblemStatement,
        Page::DataSets,
        Page::Exploration,
        Page::WorldView,
        Page::Conclusions,
        Page::Recommendations,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Background => "Background",
            Page::ProblemStatement => "Problem Statement",
            Page::DataSets => "Data Sets",
            Page::Exploration => "Exploratory Data Analysis",
            Page::WorldView => "Worldwide View",
            Page::Conclusions => "Conclusions",
            Page::Recommendations => "Recommendations",
        }
    }
}

/// Dispatch the current page to its renderer.
pub fn render(ui: &mut Ui, state: &mut AppState) {
    match state.page {
        Page::Background => background(ui),
        Page::ProblemStatement => problem_statement(ui, state),
        Page::DataSets => data_sets(ui, state),
        Page::Exploration => exploration(ui, state),
        Page::WorldView => world_view(ui, state),
        Page::Conclusions => conclusions(ui),
        Page::Recommendations => recommendations(ui),
    }
}

fn no_data_hint(ui: &mut Ui) {
    ui.label("Open a survey table to populate this page  (File → Open…).");
}

// ---------------------------------------------------------------------------
// Narrative pages
// ---------------------------------------------------------------------------

fn background(ui: &mut Ui) {
    ui.heading("Promoting Savings Through Formal Institutions");
    ui.label(RichText::new("A step towards financial resiliency").italics());
    ui.add_space(8.0);
    ui.label(
        "In line with the National Strategy for Financial Inclusion 2022-2028, \
         this dashboard profiles financial-inclusion metrics from the World Bank's \
         Global Findex survey and motivates policy recommendations for expanding \
         access to financial services, particularly for vulnerable sectors.",
    );
    ui.add_space(4.0);
    ui.label("Use the sidebar to walk through the analysis.");
}

fn conclusions(ui: &mut Ui) {
    ui.heading("Conclusions");
    ui.add_space(8.0);
    ui.label("• Access to a bank account empowers people to save and makes them more resilient against unexpected emergencies.");
    ui.label("• Account coverage still has a long way to go, and most of the barriers are ones policy can address.");
}

fn recommendations(ui: &mut Ui) {
    ui.heading("What We Can Do");
    ui.add_space(8.0);
    ui.label("• Simplify account opening and remove fees on no-frills accounts.");
    ui.label("• Offer products specifically designed to help people cope with emergencies.");
    ui.label("• Extend traditional financial literacy to include digital literacy.");
}

// ---------------------------------------------------------------------------
// Data pages
// ---------------------------------------------------------------------------

fn problem_statement(ui: &mut Ui, state: &mut AppState) {
    ui.heading(format!(
        "The current state of financial inclusion in {}",
        state.focus_economy
    ));
    ui.add_space(8.0);

    let Some(analysis) = &state.analysis else {
        no_data_hint(ui);
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.label("There is still an opportunity to expand access to financial services:");
        if let Some(pct) = analysis.focus_debit_pct {
            ui.label(
                RichText::new(format!("{pct:.1}%"))
                    .size(28.0)
                    .strong()
                    .color(crate::color::ACCENT),
            );
            ui.label("of the population owns a debit card");
        }
    });

    ui.add_space(12.0);
    ui.label("In terms of gender breakdown:");
    plot::ratio_bars(
        ui,
        "debit_by_gender",
        &analysis.debit_by_gender,
        0,
        0,
        None,
        "Gender",
        "% debit card ownership",
    );
}

fn data_sets(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Sets");
    ui.add_space(8.0);

    let Some(analysis) = &state.analysis else {
        no_data_hint(ui);
        return;
    };

    let rows = &analysis.focus_raw.respondents;
    const PREVIEW_ROWS: usize = 200;
    let shown = rows.len().min(PREVIEW_ROWS);

    ui.label(format!(
        "{} respondents from {} (showing first {}). Source: Global Findex 2017, World Bank.",
        rows.len(),
        state.focus_economy,
        shown
    ));
    ui.add_space(8.0);

    let headers = [
        "wpid_random",
        "economy",
        "female",
        "age",
        "educ",
        "inc_q",
        "account_fin",
        "fin17a",
        "fin24",
        "fin2",
    ];

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().resizable(true), headers.len())
        .header(20.0, |mut header| {
            for name in headers {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, shown, |mut row| {
                let r = &rows[row.index()];
                let cells = [
                    r.respondent_id.to_string(),
                    r.economy.clone(),
                    r.female.to_string(),
                    format!("{:.0}", r.age),
                    r.educ.to_string(),
                    r.inc_q.to_string(),
                    r.account_fin.to_string(),
                    r.fin17a.to_string(),
                    r.fin24.to_string(),
                    r.fin2.to_string(),
                ];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

fn exploration(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Exploratory Data Analysis");
    ui.add_space(8.0);

    if state.analysis.is_none() {
        no_data_hint(ui);
        return;
    }

    // Dimension selector first: switching triggers a recompute, and the
    // charts below render the fresh analysis in the same frame.
    ui.horizontal(|ui: &mut Ui| {
        for dim in CohortDimension::ALL {
            if ui
                .selectable_label(state.dimension == dim, dim.label())
                .clicked()
            {
                state.set_dimension(dim);
            }
        }
    });
    ui.add_space(8.0);

    let Some(analysis) = &state.analysis else {
        no_data_hint(ui);
        return;
    };

    if let (Some(account_pct), Some(savers_pct)) = (
        analysis.focus_account_pct,
        analysis.savers_among_account_holders_pct,
    ) {
        ui.label(RichText::new(format!(
            "{account_pct:.0}% of respondents in {} have an account at a financial institution.",
            state.focus_economy
        )));
        ui.label(RichText::new(format!(
            "Of those who do, only {savers_pct:.0}% saved in their account within the past year."
        )));
        ui.add_space(8.0);
    }

    ui.strong("Owning an account improves financial resilience across cohorts.");
    plot::resilience_lines(
        ui,
        "resilience",
        &analysis.resilience,
        state.dimension.group_key().name(),
        "probability of raising emergency funds",
    );

    ui.add_space(12.0);
    ui.strong(format!(
        "Where does {} stand in terms of account coverage?",
        state.focus_economy
    ));
    plot::ratio_bars(
        ui,
        "sea_accounts",
        &analysis.sea_account_share,
        1,
        1,
        Some(&state.focus_economy),
        "ASEAN economies",
        "% with financial account",
    );
}

fn world_view(ui: &mut Ui, state: &mut AppState) {
    ui.heading("The state of financial inclusion worldwide");
    ui.add_space(8.0);

    if state.analysis.is_none() {
        no_data_hint(ui);
        return;
    }

    // Region scope first: switching recomputes before the chart renders.
    let regions = state
        .accessor
        .as_ref()
        .map(|a| a.dataset().regions.clone())
        .unwrap_or_default();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Region:");
        let selected = state
            .world_region
            .clone()
            .unwrap_or_else(|| "All regions".to_string());
        eframe::egui::ComboBox::from_id_salt("world_region")
            .selected_text(selected)
            .show_ui(ui, |ui: &mut Ui| {
                if ui
                    .selectable_label(state.world_region.is_none(), "All regions")
                    .clicked()
                {
                    state.set_world_region(None);
                }
                for region in &regions {
                    if ui
                        .selectable_label(state.world_region.as_deref() == Some(region.as_str()), region)
                        .clicked()
                    {
                        state.set_world_region(Some(region.clone()));
                    }
                }
            });
    });
    ui.add_space(8.0);

    let Some(analysis) = &state.analysis else {
        no_data_hint(ui);
        return;
    };

    ui.label("Debit-card ownership per economy, coloured by region:");
    plot::ratio_bars(
        ui,
        "world_debit",
        &analysis.world_debit_ownership,
        1,
        2,
        None,
        "Economies",
        "% of population with debit card",
    );
}
