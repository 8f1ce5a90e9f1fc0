use askama::Template;

use crate::error::Result;
use crate::figures::{self, ExampleFunction, Figure};
use crate::models::{Aggregates, Symptom};

/// A plotly figure ready to embed: target element id and script-safe JSON.
#[derive(Debug, Clone)]
struct Chart {
    id: String,
    json: String,
}

#[derive(Debug, Default)]
struct Charts {
    next: usize,
}

impl Charts {
    fn add(&mut self, figure: &Figure) -> serde_json::Result<Chart> {
        self.next += 1;
        Ok(Chart {
            id: format!("chart-{}", self.next),
            json: figure.to_script_json()?,
        })
    }
}

#[derive(Debug, Clone)]
enum Block {
    Heading(u8, String),
    Paragraph(String),
    List(Vec<&'static str>),
    Chart(Chart),
    ChartRow(Vec<Chart>),
}

#[derive(Debug, Clone)]
struct Section {
    label: &'static str,
    blocks: Vec<Block>,
}

struct ExampleOption {
    key: &'static str,
    label: &'static str,
    selected: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage<'a> {
    sections: &'a [Section],
    options: Vec<ExampleOption>,
    example: Chart,
}

fn h(level: u8, text: &str) -> Block {
    Block::Heading(level, text.to_string())
}

fn p(text: &str) -> Block {
    Block::Paragraph(text.to_string())
}

fn context_section(aggregates: &Aggregates, charts: &mut Charts) -> serde_json::Result<Section> {
    let depression = aggregates
        .prevalence
        .iter()
        .find(|p| p.symptom == Symptom::Depression)
        .map(|p| p.yes.percent)
        .unwrap_or(0.0);

    Ok(Section {
        label: "1. Context",
        blocks: vec![
            h(2, "Context of the problem"),
            p("Mental health has gained importance in recent years as disorders such as anxiety \
               and depression have become more common. The WHO estimates that one in seven \
               adolescents lives with a mental disorder, and research on higher education reports \
               depression affecting up to 66% of university students and anxiety more than 40%, \
               with a direct effect on concentration, performance and retention."),
            p("This dataset lets us study the relationship between academic life and the \
               emotional wellbeing of university students, looking for the points where \
               institutions can act."),
            h(3, "About the dataset"),
            p("The data come from an anonymous online survey answered by university students \
               across several disciplines. The variables are:"),
            Block::List(vec![
                "Gender: the respondent's gender identity.",
                "Age: the student's age.",
                "Course: the student's academic program.",
                "Current year of study.",
                "CGPA: cumulative grade point average band.",
                "Marital status.",
                "Depression, anxiety or panic attacks: reported symptoms.",
                "Specialist treatment: whether the student sought professional help.",
            ]),
            h(3, "Overall distribution of symptoms"),
            p("Share of students reporting each emotional symptom:"),
            Block::Chart(charts.add(&figures::symptom_totals_pie(&aggregates.symptom_totals))?),
            h(4, "Detail by symptom"),
            Block::ChartRow(
                aggregates
                    .prevalence
                    .iter()
                    .map(|prevalence| charts.add(&figures::symptom_pie(prevalence)))
                    .collect::<serde_json::Result<_>>()?,
            ),
            Block::Paragraph(format!(
                "Every surveyed student reports at least one of the conditions at some point. \
                 The three conditions appear in similar proportions; {depression}% of respondents \
                 report depression."
            )),
        ],
    })
}

fn academic_section(aggregates: &Aggregates, charts: &mut Charts) -> serde_json::Result<Section> {
    Ok(Section {
        label: "2. Academic factors",
        blocks: vec![
            h(2, "Academic factors and mental health"),
            p("The first academic variable is the program of study, set against the number of \
               students who report depression in each program."),
            h(3, "Students with depression by academic program"),
            Block::Chart(charts.add(&figures::program_bar(&aggregates.program_depression))?),
            p("Grade point average is a common measure of academic performance. The next chart \
               counts students with depression in each CGPA band."),
            h(3, "Relationship between CGPA and depression"),
            Block::Chart(charts.add(&figures::gpa_bar(&aggregates.gpa_depression))?),
            p("Finally, anxiety and depression are compared across years of study. Critical \
               moments tend to come before the final year, when students make decisions about \
               their degree projects."),
            h(3, "Anxiety and depression by year of study"),
            Block::Chart(charts.add(&figures::year_bar(&aggregates.year_rates))?),
        ],
    })
}

fn personal_section(aggregates: &Aggregates, charts: &mut Charts) -> serde_json::Result<Section> {
    Ok(Section {
        label: "3. Personal factors",
        blocks: vec![
            h(2, "Personal factors and mental health"),
            p("Beyond academic variables, personal factors such as gender, age and marital status \
               can influence emotional wellbeing."),
            h(3, "Panic attacks by gender"),
            p("The share of students reporting panic attacks in each gender, which helps identify \
               groups that may be more vulnerable."),
            Block::Chart(charts.add(&figures::gender_bar(&aggregates.gender_panic))?),
            h(3, "Anxiety by marital status"),
            p("The share of students with anxiety in each marital status. Differences may relate \
               to support networks, family load or other responsibilities."),
            Block::Chart(charts.add(&figures::marital_bar(&aggregates.marital_anxiety))?),
            h(3, "Correlations between age, symptoms and treatment seeking"),
            p("The heatmap summarizes the linear correlation between age, the emotional symptoms \
               and treatment seeking. Correlation does not imply causation."),
            Block::Chart(charts.add(&figures::correlation_heatmap(&aggregates.correlation))?),
        ],
    })
}

fn help_section(aggregates: &Aggregates, charts: &mut Charts) -> serde_json::Result<Section> {
    Ok(Section {
        label: "4. Access to professional help",
        blocks: vec![
            h(2, "Do students seek professional help?"),
            p("Willingness to seek professional support is a critical part of mental health. \
               The chart shows what share of students with each symptom reports having consulted \
               a specialist."),
            Block::Chart(charts.add(&figures::help_bar(
                &aggregates.treatment_rates,
                figures::HELP_TITLE,
            ))?),
            p("There is a clear gap: many students report symptoms, but only a fraction of them \
               seek professional help, which suggests barriers such as stigma, lack of \
               information or limited access to services."),
        ],
    })
}

fn insight_section(aggregates: &Aggregates, charts: &mut Charts) -> serde_json::Result<Section> {
    Ok(Section {
        label: "5. Key insight",
        blocks: vec![
            h(2, "The key insight"),
            p("The most relevant finding is the gap between having symptoms and seeking \
               professional help. A significant part of the students reporting anxiety, \
               depression or panic attacks never see a specialist."),
            Block::Chart(charts.add(&figures::help_bar(
                &aggregates.treatment_rates,
                figures::INSIGHT_TITLE,
            ))?),
            p("Beyond identifying risk factors, institutions should work on removing the barriers \
               to psychological support services and actively promote mental health care."),
        ],
    })
}

fn limitations_section() -> Section {
    Section {
        label: "6. Limitations",
        blocks: vec![
            h(2, "Limitations and caveats"),
            p("The dataset is informative, but some limitations affect how the results should be \
               read:"),
            Block::List(vec![
                "Answers are self-reported and may carry perception bias.",
                "The sample does not represent every university student or institution.",
                "No socioeconomic variables or detailed clinical history are included.",
                "The relationships shown are correlations and do not establish causation.",
                "Participation bias: people interested in the topic are more likely to answer.",
            ]),
            p("These limitations do not invalidate the findings, but they call for caution and \
               for complementary quantitative and qualitative studies."),
        ],
    }
}

fn conclusions_section() -> Section {
    Section {
        label: "7. Conclusions and recommendations",
        blocks: vec![
            h(2, "Conclusions and recommendations"),
            p("Student mental health is associated with both academic and personal factors, and \
               there is a considerable gap between suffering symptoms and seeking professional \
               help."),
            p("Recommendations for institutions and student wellbeing policy:"),
            Block::List(vec![
                "Strengthen institutional wellbeing programs and psychological support services.",
                "Run awareness campaigns that reduce the stigma around mental health.",
                "Offer academic mentoring to students with low performance and high emotional load.",
                "Design clear, accessible routes for students to ask for help in time.",
                "Monitor emotional wellbeing periodically as part of the educational experience.",
            ]),
            p("The data do more than describe a situation: caring for students' mental health is \
               essential to their academic success and personal development."),
        ],
    }
}

/// The narrative sections, built once; only the example chart changes between requests.
#[derive(Debug, Clone)]
pub struct Dashboard {
    sections: Vec<Section>,
}

impl Dashboard {
    pub fn build(aggregates: &Aggregates) -> serde_json::Result<Self> {
        let mut charts = Charts::default();
        let sections = vec![
            context_section(aggregates, &mut charts)?,
            academic_section(aggregates, &mut charts)?,
            personal_section(aggregates, &mut charts)?,
            help_section(aggregates, &mut charts)?,
            insight_section(aggregates, &mut charts)?,
            limitations_section(),
            conclusions_section(),
        ];
        Ok(Dashboard { sections })
    }

    pub fn render(&self, selection: ExampleFunction) -> Result<String> {
        let page = DashboardPage {
            sections: &self.sections,
            options: ExampleFunction::ALL
                .into_iter()
                .map(|function| ExampleOption {
                    key: function.key(),
                    label: function.label(),
                    selected: function == selection,
                })
                .collect(),
            example: Chart {
                id: "example-chart".to_string(),
                json: figures::example_figure(selection).to_script_json()?,
            },
        };
        Ok(page.render()?)
    }
}
