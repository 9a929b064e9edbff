use anyhow::{Context, Result};
use minijinja::{context, Environment};

use super::form::ControlsForm;
use super::plot::Components;
use crate::report::composer::Report;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");

// ---------------------------------------------------------------------------
// Page rendering
// ---------------------------------------------------------------------------

/// Compiled page templates, shared by all workers.
#[derive(Debug)]
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)
            .context("compiling index.html")?;
        Ok(Self { env })
    }

    /// Render the index page. `report` is absent when composing failed, in
    /// which case `error` carries the message shown above the form.
    pub fn index(
        &self,
        form: &ControlsForm,
        report: Option<&Report>,
        components: &Components,
        error: Option<&str>,
    ) -> Result<String> {
        let template = self.env.get_template("index.html")?;
        let html = template.render(context! {
            form => form,
            report => report,
            script => &components.script,
            div => &components.div,
            error => error,
        })?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sequence::SequenceSummary;
    use crate::ui::form::Controls;
    use crate::config::Settings;

    fn form() -> ControlsForm {
        ControlsForm::new(&Controls::defaults(&Settings::default()), vec!["seq<1>".into()])
    }

    #[test]
    fn test_error_page_has_form_and_escaped_message() {
        let html = Pages::new()
            .unwrap()
            .index(&form(), None, &Components::default(), Some("no <b>data</b>"))
            .unwrap();
        assert!(html.contains(r#"<form class="controls""#));
        assert!(html.contains("seq&lt;1&gt;"));
        assert!(html.contains("no &lt;b&gt;data"));
        assert!(!html.contains("<b>data"));
        assert!(!html.contains("class=\"figure\""));
    }

    #[test]
    fn test_report_without_figure_has_no_plot_area() {
        let report = Report {
            name: "Rv0011c".into(),
            summary: SequenceSummary {
                rows: 3,
                peptide_length: 9,
                sequence: Some("MKLVATSGQWE".into()),
                sequence_length: Some(11),
            },
            figure: None,
            top_binders: Vec::new(),
        };
        let html = Pages::new()
            .unwrap()
            .index(&form(), Some(&report), &Components::default(), None)
            .unwrap();
        assert!(html.contains("No peptides of Rv0011c score at least"));
        assert!(html.contains("MKLVATSGQWE"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_components_are_not_escaped() {
        let components = Components {
            script: r#"<script type="application/json" id="figure-data">{}</script>"#.into(),
            div: r#"<div class="figure"><svg></svg></div>"#.into(),
        };
        let report = Report {
            name: "Rv0011c".into(),
            summary: SequenceSummary {
                rows: 0,
                peptide_length: 0,
                sequence: None,
                sequence_length: None,
            },
            figure: None,
            top_binders: Vec::new(),
        };
        let html = Pages::new()
            .unwrap()
            .index(&form(), Some(&report), &components, None)
            .unwrap();
        assert!(html.contains(r#"<div class="figure"><svg></svg></div>"#));
        assert!(html.contains(r#"id="figure-data""#));
    }
}
