// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{
    ProjectionParameters, RawProjectionInput, SeededRandom, ThreadRandom, project_future_savings,
    simulate_many,
};
use crate::utils::pretty_table;
use anyhow::Result;
use serde_json::json;
use tracing::info;

/// Read the projection form from `project` arguments.
pub fn raw_input(sub: &clap::ArgMatches) -> RawProjectionInput {
    let arg = |name: &str| sub.get_one::<String>(name).cloned().unwrap_or_default();
    RawProjectionInput {
        monthly_saving: arg("saving"),
        monthly_expenses: arg("expenses"),
        years: arg("years"),
        include_roi: !sub.get_flag("no_roi"),
        roi_min: arg("roi_min"),
        roi_max: arg("roi_max"),
        include_salary_increment: !sub.get_flag("no_increment"),
        salary_increment_min: arg("increment_min"),
        salary_increment_max: arg("increment_max"),
        increment_frequency_years: arg("increment_every"),
    }
}

pub fn handle(sub: &clap::ArgMatches, ccy: &str) -> Result<()> {
    let params = raw_input(sub).parse()?;
    let seed = sub.get_one::<u64>("seed").copied();
    let json_flag = sub.get_flag("json");

    if let Some(runs) = sub.get_one::<u64>("runs").map(|r| *r as usize) {
        let seed = seed.unwrap_or_else(rand::random);
        info!(runs, seed, "running repeated projection");
        let summary = simulate_many(&params, runs, seed)?;
        if json_flag {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "parameters": params,
                    "seed": seed,
                    "summary": summary,
                }))?
            );
            return Ok(());
        }
        print_parameters(&params);
        let rows = vec![
            vec!["Runs".to_string(), summary.runs.to_string()],
            vec!["Mean".to_string(), format!("{} {:.2}", ccy, summary.mean)],
            vec!["Worst".to_string(), format!("{} {:.2}", ccy, summary.min)],
            vec!["5th percentile".to_string(), format!("{} {:.2}", ccy, summary.p5)],
            vec!["Median".to_string(), format!("{} {:.2}", ccy, summary.p50)],
            vec!["95th percentile".to_string(), format!("{} {:.2}", ccy, summary.p95)],
            vec!["Best".to_string(), format!("{} {:.2}", ccy, summary.max)],
        ];
        println!("{}", pretty_table(&["Outcome", "Projected savings"], rows));
        return Ok(());
    }

    let total = match seed {
        Some(s) => project_future_savings(&params, &mut SeededRandom::new(s))?,
        None => project_future_savings(&params, &mut ThreadRandom::new())?,
    };
    if json_flag {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "parameters": params, "total": total }))?
        );
        return Ok(());
    }
    print_parameters(&params);
    println!(
        "Projected savings after {} years: {} {:.2}",
        params.years, ccy, total
    );
    Ok(())
}

fn print_parameters(p: &ProjectionParameters) {
    let roi = if p.include_roi {
        format!("{}% - {}% per year", p.roi_min, p.roi_max)
    } else {
        "off".to_string()
    };
    let increment = if p.include_salary_increment {
        format!(
            "{}% - {}% every {} years",
            p.salary_increment_min, p.salary_increment_max, p.increment_frequency_years
        )
    } else {
        "off".to_string()
    };
    let rows = vec![
        vec!["Monthly saving".to_string(), format!("{:.2}", p.monthly_saving)],
        vec!["Monthly expenses".to_string(), format!("{:.2}", p.monthly_expenses)],
        vec!["Years".to_string(), p.years.to_string()],
        vec!["ROI".to_string(), roi],
        vec!["Salary increment".to_string(), increment],
    ];
    println!("{}", pretty_table(&["Parameter", "Value"], rows));
}
