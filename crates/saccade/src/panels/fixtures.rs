//! Tables shared by the panel and dashboard tests.

use crate::config::DashboardConfig;
use crate::selection::Inputs;
use crate::table::Table;
use proptest::prelude::*;

pub const HEADER: &str = "\
Task,Group,Participant,Trial,Saccade,Amplitude,Peak Velocity,Latency,\
Pixel Distance,Degree Distance,Saccade-X,Saccade-Y,Target-X,Target-Y,Level";

/// `gapBL401ak` has three trials; trial 2 holds four saccades with
/// amplitudes 1.0, 3.5, 2.0, 0.5. Only its saccade 0 row carries the
/// target at (512, 300).
const SCENARIO: &str = "\
GAP,BL,gapBL401ak,,,2.0,300,180,150,4.0,,,,,P
GAP,BL,gapBL401ak,1,,1.5,280,175,140,3.8,,,,,T
GAP,BL,gapBL401ak,2,,2.0,310,190,155,4.1,,,,,T
GAP,BL,gapBL401ak,3,,2.5,320,185,160,4.3,,,,,T
GAP,BL,gapBL401ak,1,0,1.5,280,175,140,3.8,410,300,400,290,S
GAP,BL,gapBL401ak,2,0,1.0,250,190,120,3.0,420,305,512,300,S
GAP,BL,gapBL401ak,2,1,3.5,400,210,180,4.9,505,298,520,310,S
GAP,BL,gapBL401ak,2,2,2.0,260,230,150,4.0,515,302,520,310,S
GAP,BL,gapBL401ak,2,3,0.5,120,250,90,2.1,511,301,520,310,S
GAP,BL,gapBL401ak,3,0,2.5,320,185,160,4.3,600,310,640,320,S
MGS,PD,mgsPD201xy,,,3.0,350,400,200,5.0,,,,,P
MGS,PD,mgsPD201xy,1,,3.0,350,400,200,5.0,,,,,T
MGS,PD,mgsPD201xy,1,0,3.0,350,400,200,5.0,300,200,310,210,S
VGS,HC,vgsHC301zz,,,1.2,200,150,100,2.5,,,,,P
ANTI,HC,antiHC501qq,,,1.1,190,140,95,2.4,,,,,P
ANTI,HC,antiHC501qq,1,,1.1,190,140,95,2.4,,,,,T
";

pub fn table_from_rows(rows: &str) -> Table {
    let csv = format!("{HEADER}\n{rows}");
    Table::from_reader(csv.as_bytes()).unwrap()
}

pub fn scenario_table() -> Table {
    table_from_rows(SCENARIO)
}

/// Participant `p0`, trial 1, one saccade per amplitude (`NaN` written
/// as an empty cell).
pub fn table_from_amplitudes(amplitudes: &[f64]) -> Table {
    let mut rows = String::from("GAP,BL,p0,,,1,1,1,1,1,,,,,P\n");
    rows.push_str("GAP,BL,p0,1,,1,1,1,1,1,,,,,T\n");
    for (k, a) in amplitudes.iter().enumerate() {
        let cell = if a.is_nan() { String::new() } else { a.to_string() };
        rows.push_str(&format!(
            "GAP,BL,p0,1,{k},{cell},1,1,1,1,{k},0,5,5,S\n"
        ));
    }
    table_from_rows(&rows)
}

pub fn default_inputs(table: &Table, config: &DashboardConfig) -> Inputs {
    Inputs::seeded(
        table,
        config.initial_measure(),
        &config.default_selection,
    )
}

const TASKS: [(&str, &str); 4] =
    [("GAP", "BL"), ("MGS", "PD"), ("VGS", "HC"), ("ANTI", "HC")];

type Values = [f64; 9];

fn values_strategy() -> impl Strategy<Value = Values> {
    proptest::array::uniform9(-500.0f64..500.0)
}

fn cells(values: &Values) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Well-formed datasets: every participant has one aggregate row, one
/// trial aggregate per trial and at least one saccade per trial.
pub fn arb_table() -> impl Strategy<Value = Table> {
    let trial = (
        values_strategy(),
        proptest::collection::vec(values_strategy(), 1..5),
    );
    let participant =
        (0usize..TASKS.len(), proptest::collection::vec(trial, 1..6));
    proptest::collection::vec(participant, 1..5).prop_map(|participants| {
        let mut rows = String::new();
        for (p, (task_idx, trials)) in participants.iter().enumerate() {
            let (task, group) = TASKS[*task_idx];
            let name = format!("p{p}");
            let (first, _) = &trials[0];
            rows.push_str(&format!(
                "{task},{group},{name},,,{},P\n",
                cells(first)
            ));
            for (t, (aggregate, saccades)) in trials.iter().enumerate() {
                let trial_no = t + 1;
                rows.push_str(&format!(
                    "{task},{group},{name},{trial_no},,{},T\n",
                    cells(aggregate)
                ));
                for (k, saccade) in saccades.iter().enumerate() {
                    rows.push_str(&format!(
                        "{task},{group},{name},{trial_no},{k},{},S\n",
                        cells(saccade)
                    ));
                }
            }
        }
        table_from_rows(&rows)
    })
}
