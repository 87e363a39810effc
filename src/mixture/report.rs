//! Plain-text summaries of fitted components and seeded HMM parameters.
//!
//! The model summary is an audit record only; nothing reads it back.
//! Layout:
//!
//! ```text
//! HMM
//! ---------------------------------
//!
//! Means
//! <means>
//! ---------------------------------
//!
//! Covariances (sigma^2)
//! <covars>
//! ...
//! ```
//!
//! with `Start probability` and `Transition matrix` following in that order.
use crate::mixture::{core::MixtureComponent, hmm_init::HmmParams};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

const SECTION_RULE: &str = "---------------------------------";
const COMPONENT_RULE: &str = "---------------------------------------";

/// Write the model summary for `params` to `sink`.
pub fn write_model_summary<W: Write>(sink: &mut W, params: &HmmParams) -> io::Result<()> {
    writeln!(sink, "HMM")?;
    write_section(sink, "Means", &params.means)?;
    write_section(sink, "Covariances (sigma^2)", &params.covars)?;
    write_section(sink, "Start probability", &params.start_prob)?;
    write_section(sink, "Transition matrix", &params.trans_mat)?;
    Ok(())
}

/// Write the model summary to a new file at `path`, replacing any existing
/// file.
pub fn save_model_summary<P: AsRef<Path>>(path: P, params: &HmmParams) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_model_summary(&mut out, params)?;
    out.flush()
}

/// One line per component, numbered from 1, framed by rule lines.
///
/// 1-D: `Gaussian 1: A1:120, mu_E1:0.25, sigma_E1:0.06`
/// 2-D: `Gaussian 1: A1:120, mu_DD1:..., sigma_DD1:..., mu_DA1:..., sigma_DA1:...`
pub fn write_components<W: Write>(sink: &mut W, components: &[MixtureComponent]) -> io::Result<()> {
    writeln!(sink, "{COMPONENT_RULE}\nGaussian parameter")?;
    for (i, c) in components.iter().enumerate() {
        let k = i + 1;
        match *c {
            MixtureComponent::OneD { amplitude, mean, std } => writeln!(
                sink,
                "Gaussian {k}: A{k}:{amplitude:.0}, mu_E{k}:{mean:.2}, sigma_E{k}:{std:.2}"
            )?,
            MixtureComponent::TwoD { amplitude, mean_a, std_a, mean_b, std_b } => writeln!(
                sink,
                "Gaussian {k}: A{k}:{amplitude:.0}, mu_DD{k}:{mean_a:.2}, sigma_DD{k}:{std_a:.2}, \
                 mu_DA{k}:{mean_b:.2}, sigma_DA{k}:{std_b:.2}"
            )?,
        }
    }
    writeln!(sink, "{COMPONENT_RULE}")
}

fn write_section<W: Write, T: std::fmt::Display>(
    sink: &mut W, label: &str, value: &T,
) -> io::Result<()> {
    writeln!(sink, "{SECTION_RULE}\n")?;
    writeln!(sink, "{label}")?;
    writeln!(sink, "{value}")
}
