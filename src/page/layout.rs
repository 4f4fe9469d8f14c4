//! Page Layout
//! The fixed sequence of dashboard sections and what each one hosts.

use super::markup::{paragraphs, Paragraph};

/// Relative widths of left column, spacer and right column.
pub const COLUMN_WEIGHTS: [f32; 3] = [9.0, 1.0, 9.0];

/// Charts placed on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSlot {
    TemperatureTrend,
    Co2Map,
    /// Line chart driven by the country multi-select
    Co2Trend,
    NetZeroMap,
}

/// Content of one region of a section.
#[derive(Debug, Clone, PartialEq)]
pub enum Pane {
    Text(Vec<Paragraph>),
    Image { caption: String },
    Chart(ChartSlot),
}

/// How a section arranges its panes.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Nothing below the section text
    Empty,
    /// One pane across the full width
    Full(Pane),
    /// Left and right columns separated by a spacer
    Columns(Option<Pane>, Option<Pane>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub text: Vec<Paragraph>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub title: String,
    pub intro: Vec<Paragraph>,
    pub sections: Vec<Section>,
}

impl Page {
    /// Charts in the order they appear.
    pub fn chart_slots(&self) -> Vec<ChartSlot> {
        let mut slots = Vec::new();
        for section in &self.sections {
            let panes: Vec<&Pane> = match &section.body {
                Body::Empty => Vec::new(),
                Body::Full(pane) => vec![pane],
                Body::Columns(left, right) => left.iter().chain(right.iter()).collect(),
            };
            slots.extend(panes.into_iter().filter_map(|p| match p {
                Pane::Chart(slot) => Some(*slot),
                _ => None,
            }));
        }
        slots
    }
}

const TITLE: &str = "Global Warming and CO2 Emission";

const INTRO: &str = "
As extreme weather is suffered world-wide, the importance of environmental protection and of reaching net zero is
recognised by more and more countries. By the end of 2021, 137 countries had committed to carbon neutrality, as tracked by the
[Energy and Climate Intelligence Unit](https://eciu.net/netzerotracker).
Most of the commitments target a year around 2050.
";

const GLOBAL_WARMING: &str = "
A global temperature rise of 1$\\degree$C may seem small. In a geological context, however, a global-scale warming of 1$\\degree$C in less
than 150 years is an unusually large change in a short span of time. The warming is also not uniform: land surface temperatures
rise more than ocean temperatures. As the map on the right shows, average temperatures over land have risen about twice as much as
over the ocean. Compared to the 1951 - 1980 average, temperatures over land increased by around 1.3$\\degree$C. On December 14, 2021 the
[WMO](https://public.wmo.int/en/media/press-release/wmo-recognizes-new-arctic-temperature-record-of-38%E2%81%B0c) recognized a new
Arctic temperature record of 38$\\degree$C.
";

const IMAGE_CAPTION: &str = "Local temperatures in 2019 relative to average temperature in 1951-1980";

const TEMPERATURE_TREND: &str = "
Over the last few decades global temperature has risen sharply, especially from 1990 to 2019. From 1850 to 2019 the average
temperature rise is about 1.1$\\degree$C.
";

const REFERENCES: &str = "
[Our World in Data - CO2 Emission](https://ourworldindata.org/co2-emissions#licence)

[Energy & Climate Intelligence Unit](https://eciu.net/netzerotracker)

[United Nations - The 17 Goals](https://sdgs.un.org/goals)
";

/// Build the dashboard page.
///
/// Order: title, global warming (text and image), temperature trend, CO2 per
/// capita (map and interactive chart), net-zero map, references.
pub fn compose() -> Page {
    Page {
        title: TITLE.to_string(),
        intro: paragraphs(INTRO),
        sections: vec![
            Section {
                heading: "Global Warming".to_string(),
                text: Vec::new(),
                body: Body::Columns(
                    Some(Pane::Text(paragraphs(GLOBAL_WARMING))),
                    Some(Pane::Image {
                        caption: IMAGE_CAPTION.to_string(),
                    }),
                ),
            },
            Section {
                heading: "Global Temperature Trend".to_string(),
                text: paragraphs(TEMPERATURE_TREND),
                body: Body::Columns(Some(Pane::Chart(ChartSlot::TemperatureTrend)), None),
            },
            Section {
                heading: "CO2 Per Capita".to_string(),
                text: Vec::new(),
                body: Body::Columns(
                    Some(Pane::Chart(ChartSlot::Co2Map)),
                    Some(Pane::Chart(ChartSlot::Co2Trend)),
                ),
            },
            Section {
                heading: "Countries with Net-Zero Emission Targets".to_string(),
                text: Vec::new(),
                body: Body::Full(Pane::Chart(ChartSlot::NetZeroMap)),
            },
            Section {
                heading: "Reference".to_string(),
                text: paragraphs(REFERENCES),
                body: Body::Empty,
            },
        ],
    }
}

/// Widths of the left column, spacer and right column for `available` points.
pub fn column_widths(available: f32) -> [f32; 3] {
    let total: f32 = COLUMN_WEIGHTS.iter().sum();
    COLUMN_WEIGHTS.map(|w| available * w / total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::markup::Span;

    #[test]
    fn sections_follow_fixed_order() {
        let page = compose();
        let headings: Vec<&str> = page.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec![
                "Global Warming",
                "Global Temperature Trend",
                "CO2 Per Capita",
                "Countries with Net-Zero Emission Targets",
                "Reference",
            ]
        );
        assert_eq!(page.title, "Global Warming and CO2 Emission");
    }

    #[test]
    fn each_chart_appears_once_in_order() {
        assert_eq!(
            compose().chart_slots(),
            vec![
                ChartSlot::TemperatureTrend,
                ChartSlot::Co2Map,
                ChartSlot::Co2Trend,
                ChartSlot::NetZeroMap,
            ]
        );
    }

    #[test]
    fn intro_image_sits_right_of_text() {
        let page = compose();
        match &page.sections[0].body {
            Body::Columns(Some(Pane::Text(text)), Some(Pane::Image { caption })) => {
                assert!(!text.is_empty());
                assert!(caption.contains("1951-1980"));
            }
            other => panic!("unexpected layout {:?}", other),
        }
    }

    #[test]
    fn references_are_links() {
        let page = compose();
        let refs = &page.sections[4].text;
        assert_eq!(refs.len(), 3);
        assert!(refs
            .iter()
            .all(|p| matches!(p.as_slice(), [Span::Link { .. }])));
    }

    #[test]
    fn narrative_uses_degree_symbol() {
        let page = compose();
        let Body::Columns(Some(Pane::Text(text)), _) = &page.sections[0].body else {
            panic!("expected text column");
        };
        let flat: String = text
            .iter()
            .flatten()
            .filter_map(|s| match s {
                Span::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert!(flat.contains("1°C"));
        assert!(!flat.contains('$'));
    }

    #[test]
    fn column_widths_use_9_1_9_split() {
        let [left, gap, right] = column_widths(190.0);
        assert!((left - 90.0).abs() < 1e-4);
        assert!((gap - 10.0).abs() < 1e-4);
        assert!((right - 90.0).abs() < 1e-4);
    }
}
