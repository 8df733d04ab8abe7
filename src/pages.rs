//! Static HTML site: one file per navigation page
//!
//! Each `Page` has a render function in `DISPATCH` producing a `PageView`
//! (template name plus page context). `render_site` renders every view
//! through the embedded minijinja templates, which extend a shared layout
//! (title, left-hand navigation, vega-embed scripts), and writes it to the
//! output directory. When the dataset could not be loaded, the data pages
//! render the notice template instead.

use crate::config::DashboardConfig;
use crate::pipeline::{build_analysis, AnalysisReport, AnalysisTab, SelectionOverrides};
use crate::sales::error::{DashboardError, Result};
use crate::sales::summary::{describe, profile};
use crate::sales::table::{SalesTable, TEXT_NULL_SENTINEL};
use minijinja::{context, Environment, Value};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SITE_TITLE: &str = "Video Game Sales Dashboard";

/// Templates compiled into the binary; page templates extend `base.html`
const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../templates/base.html")),
    ("macros.html", include_str!("../templates/macros.html")),
    ("notice.html", include_str!("../templates/notice.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("data_overview.html", include_str!("../templates/data_overview.html")),
    ("profile_report.html", include_str!("../templates/profile_report.html")),
    ("analysis.html", include_str!("../templates/analysis.html")),
    ("about.html", include_str!("../templates/about.html")),
];

const STATS_HEADER: [&str; 9] = ["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"];

const PROFILE_HEADER: [&str; 5] = ["Column", "Type", "Nulls", "Zeros", "Distinct"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    DataOverview,
    ProfileReport,
    Analysis,
    About,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::DataOverview,
        Page::ProfileReport,
        Page::Analysis,
        Page::About,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::DataOverview => "Data Overview",
            Page::ProfileReport => "Profile Report",
            Page::Analysis => "Analysis",
            Page::About => "About",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Page::Home => "index.html",
            Page::DataOverview => "data-overview.html",
            Page::ProfileReport => "profile-report.html",
            Page::Analysis => "analysis.html",
            Page::About => "about.html",
        }
    }
}

/// Template to render and the values it reads under `page`
#[derive(Debug, Clone)]
pub struct PageView {
    pub template: &'static str,
    pub context: Value,
}

type RenderFn = fn(&SiteContext) -> Result<PageView>;

/// Page renderers
const DISPATCH: [(Page, RenderFn); 5] = [
    (Page::Home, render_home),
    (Page::DataOverview, render_data_overview),
    (Page::ProfileReport, render_profile_report),
    (Page::Analysis, render_analysis),
    (Page::About, render_about),
];

/// Outcome of loading the dataset
#[derive(Debug, Clone)]
pub enum DataState {
    Loaded(Arc<SalesTable>),
    /// Shown to the user as a notice
    Unavailable(String),
}

impl DataState {
    /// Keep fetch failures the user should see; propagate everything else
    pub fn from_fetch(result: Result<Arc<SalesTable>>) -> Result<Self> {
        match result {
            Ok(table) => Ok(DataState::Loaded(table)),
            Err(e @ (DashboardError::SourceUnavailable(_) | DashboardError::SchemaMismatch { .. })) => {
                tracing::warn!(error = %e, "Dataset unavailable, data pages will show a notice");
                Ok(DataState::Unavailable(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}

/// Everything the pages are rendered from
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub config: DashboardConfig,
    pub data: DataState,
    pub selection: SelectionOverrides,
}

/// Render every page into `out_dir`, returning the written paths
pub fn render_site(ctx: &SiteContext, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)?;
    let env = environment()?;

    let mut written = Vec::with_capacity(DISPATCH.len());
    for (page, _) in DISPATCH {
        let path = out_dir.join(page.file_name());
        std::fs::write(&path, render_with(&env, ctx, page)?)?;
        tracing::debug!(page = page.title(), path = %path.display(), "Wrote page");
        written.push(path);
    }

    tracing::info!(
        pages = written.len(),
        out_dir = %out_dir.display(),
        "Rendered dashboard"
    );
    Ok(written)
}

/// Full HTML document of one page
pub fn render_page(ctx: &SiteContext, page: Page) -> Result<String> {
    render_with(&environment()?, ctx, page)
}

/// Template environment with every page template loaded (HTML
/// auto-escaping follows the `.html` names)
fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    for (name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

#[derive(Serialize)]
struct NavItem {
    file: &'static str,
    title: &'static str,
    active: bool,
}

fn render_with(env: &Environment<'_>, ctx: &SiteContext, page: Page) -> Result<String> {
    let render = DISPATCH
        .iter()
        .find(|(p, _)| *p == page)
        .map(|(_, render)| *render)
        .ok_or_else(|| DashboardError::Config(format!("No renderer for page {:?}", page)))?;
    let view = render(ctx)?;

    let nav: Vec<NavItem> = Page::ALL
        .iter()
        .map(|p| NavItem {
            file: p.file_name(),
            title: p.title(),
            active: *p == page,
        })
        .collect();

    let html = env.get_template(view.template)?.render(context! {
        site_title => SITE_TITLE,
        page_title => page.title(),
        nav => nav,
        page => view.context,
    })?;
    Ok(html)
}

/// Build the page from the loaded table, or the unavailable notice
fn with_table(
    ctx: &SiteContext,
    template: &'static str,
    body: impl FnOnce(&SalesTable) -> Result<Value>,
) -> Result<PageView> {
    match &ctx.data {
        DataState::Loaded(table) => Ok(PageView {
            template,
            context: body(table)?,
        }),
        DataState::Unavailable(reason) => Ok(PageView {
            template: "notice.html",
            context: context! { reason => reason },
        }),
    }
}

fn render_home(_ctx: &SiteContext) -> Result<PageView> {
    Ok(PageView {
        template: "home.html",
        context: context! {
            links => context! {
                overview => Page::DataOverview.file_name(),
                profile => Page::ProfileReport.file_name(),
                analysis => Page::Analysis.file_name(),
            },
        },
    })
}

fn render_data_overview(ctx: &SiteContext) -> Result<PageView> {
    with_table(ctx, "data_overview.html", |table| {
        let shown = ctx.config.overview_rows.min(table.height());
        let head = table.head_text(shown)?;
        let stats: Vec<Vec<String>> = describe(table)?
            .iter()
            .map(|s| {
                vec![
                    s.column.clone(),
                    s.count.to_string(),
                    number(s.mean),
                    number(s.std),
                    number(s.min),
                    number(s.q25),
                    number(s.q50),
                    number(s.q75),
                    number(s.max),
                ]
            })
            .collect();

        Ok(context! {
            shown => shown,
            total => table.height(),
            columns => table.column_names(),
            head => head,
            stats_header => STATS_HEADER,
            stats => stats,
        })
    })
}

fn render_profile_report(ctx: &SiteContext) -> Result<PageView> {
    with_table(ctx, "profile_report.html", |table| {
        let profiles: Vec<Vec<String>> = profile(table)?
            .iter()
            .map(|p| {
                vec![
                    p.column.clone(),
                    p.dtype.clone(),
                    p.nulls.to_string(),
                    p.zeros.to_string(),
                    p.distinct.to_string(),
                ]
            })
            .collect();

        Ok(context! {
            rows => table.height(),
            columns => profiles.len(),
            sentinel => TEXT_NULL_SENTINEL,
            header => PROFILE_HEADER,
            profiles => profiles,
        })
    })
}

#[derive(Serialize)]
struct TabView {
    anchor: &'static str,
    title: &'static str,
    selection: Option<SelectionView>,
    region: Option<String>,
    charts: Vec<ChartView>,
}

/// Current filter choices of the Sales tab
#[derive(Serialize)]
struct SelectionView {
    publisher: String,
    genres: Vec<GenreChoice>,
    years: String,
    rows: usize,
}

#[derive(Serialize)]
struct GenreChoice {
    name: String,
    selected: bool,
}

#[derive(Serialize)]
struct ChartView {
    id: String,
    spec: serde_json::Value,
}

fn render_analysis(ctx: &SiteContext) -> Result<PageView> {
    with_table(ctx, "analysis.html", |table| {
        let selection = ctx.selection.resolve(table, &ctx.config)?;
        let report = build_analysis(table, selection, &ctx.config)?;

        let mut chart_id = 0;
        let mut tabs = Vec::with_capacity(AnalysisTab::ALL.len());
        for tab in AnalysisTab::ALL {
            let charts = report
                .charts(tab)
                .iter()
                .map(|chart| {
                    chart_id += 1;
                    ChartView {
                        id: format!("chart-{}", chart_id),
                        spec: chart.to_vega_lite(),
                    }
                })
                .collect();

            tabs.push(TabView {
                anchor: tab.anchor(),
                title: tab.title(),
                selection: match tab {
                    AnalysisTab::Sales => Some(selection_view(&report, table)?),
                    _ => None,
                },
                region: match tab {
                    AnalysisTab::GenrePublisher => Some(report.selection.region.to_string()),
                    _ => None,
                },
                charts,
            });
        }

        Ok(context! { tabs => tabs })
    })
}

fn render_about(_ctx: &SiteContext) -> Result<PageView> {
    Ok(PageView {
        template: "about.html",
        context: Value::UNDEFINED,
    })
}

fn selection_view(report: &AnalysisReport, table: &SalesTable) -> Result<SelectionView> {
    let filter = &report.selection.filter;
    let genres = table
        .genres()?
        .into_iter()
        .map(|name| GenreChoice {
            selected: filter.genres.contains(&name),
            name,
        })
        .collect();

    Ok(SelectionView {
        publisher: filter.publisher.clone(),
        genres,
        years: filter.years.to_string(),
        rows: report.filtered_rows,
    })
}

fn number(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.3}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sales::testing::sample_table;

    fn loaded_context() -> SiteContext {
        SiteContext {
            config: DashboardConfig::default(),
            data: DataState::Loaded(Arc::new(sample_table())),
            selection: SelectionOverrides::default(),
        }
    }

    #[test]
    fn test_dispatch_covers_every_page() {
        for page in Page::ALL {
            assert!(DISPATCH.iter().any(|(p, _)| *p == page), "{:?}", page);
        }
    }

    #[test]
    fn test_render_site_writes_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let written = render_site(&loaded_context(), dir.path()).unwrap();
        assert_eq!(written.len(), 5);

        for page in Page::ALL {
            let html = std::fs::read_to_string(dir.path().join(page.file_name())).unwrap();
            assert!(html.contains("<nav>"));
            assert!(html.contains("class=\"active\""));
            for other in Page::ALL {
                assert!(html.contains(other.file_name()));
            }
        }

        let analysis = std::fs::read_to_string(dir.path().join("analysis.html")).unwrap();
        assert_eq!(analysis.matches("vegaEmbed(\"#chart-").count(), 10);
        assert!(analysis.contains("Sum of Sales by Region"));
        assert!(analysis.contains("Publisher: <strong>Nintendo</strong>"));
    }

    #[test]
    fn test_data_overview_tables() {
        let html = render_page(&loaded_context(), Page::DataOverview).unwrap();
        assert!(html.contains("<td>Wii Sports</td>"));
        assert!(html.contains("Summary Statistics"));
        assert!(html.contains("<td>Global_Sales</td>"));
        assert!(html.contains("Showing 8 of 8 rows."));
    }

    #[test]
    fn test_unavailable_source_renders_notice() {
        let state = DataState::from_fetch(Err(DashboardError::SourceUnavailable(
            "timed out".to_string(),
        )))
        .unwrap();
        let ctx = SiteContext {
            config: DashboardConfig::default(),
            data: state,
            selection: SelectionOverrides::default(),
        };

        let dir = tempfile::tempdir().unwrap();
        render_site(&ctx, dir.path()).unwrap();

        let analysis = std::fs::read_to_string(dir.path().join("analysis.html")).unwrap();
        assert!(analysis.contains("class=\"notice\""));
        assert!(analysis.contains("timed out"));
        assert!(!analysis.contains("vegaEmbed(\"#chart-"));

        let home = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(!home.contains("class=\"notice\""));
    }

    #[test]
    fn test_other_errors_propagate() {
        let result = DataState::from_fetch(Err(DashboardError::Config("bad".to_string())));
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_blank_payload_renders_notice() {
        let fetched = SalesTable::from_csv_bytes(Vec::new()).map(Arc::new);
        let state = DataState::from_fetch(fetched).unwrap();
        let ctx = SiteContext {
            config: DashboardConfig::default(),
            data: state,
            selection: SelectionOverrides::default(),
        };

        let html = render_page(&ctx, Page::DataOverview).unwrap();
        assert!(html.contains("class=\"notice\""));
        assert!(html.contains("Schema mismatch"));
        assert!(html.contains("Year_of_Release"));
    }

    #[test]
    fn test_text_is_html_escaped() {
        let ctx = SiteContext {
            config: DashboardConfig::default(),
            data: DataState::Unavailable("sheet <b>\"Tom & Jerry\"</b>".to_string()),
            selection: SelectionOverrides::default(),
        };
        let html = render_page(&ctx, Page::Analysis).unwrap();
        assert!(html.contains("sheet &lt;b&gt;&quot;Tom &amp; Jerry&quot;&lt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_chart_spec_is_embedded_as_json() {
        let html = render_page(&loaded_context(), Page::Analysis).unwrap();
        assert!(html.contains("vegaEmbed(\"#chart-1\", {"));
        assert!(html.contains("\"$schema\":\"https://vega.github.io/schema/vega-lite/v5.json\""));
        // default selection keeps every genre
        assert!(html.contains("<strong>Sports</strong>, <strong>Platform</strong>"));
        assert!(!html.contains("<s>"));
    }
}
