// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod analyze;
pub mod doctor;
pub mod importer;
pub mod loan;
pub mod tax;
pub mod transactions;

use crate::classify::Classifier;
use crate::rules::ClassifierRules;
use anyhow::Result;

/// Build a classifier from `--rules`, falling back to the built-in tables.
pub(crate) fn classifier_for(sub: &clap::ArgMatches) -> Result<Classifier> {
    match sub.get_one::<String>("rules") {
        Some(path) => Classifier::new(ClassifierRules::from_json_file(path)?),
        None => Ok(Classifier::with_defaults()),
    }
}
