use serde::Serialize;
use std::path::PathBuf;

use super::locations::SourceLocation;

/// Half width (degrees) of the RA/DEC box searched around each source
pub const CONE_HALF_WIDTH_DEG: f64 = 0.00027;

/// Builder of the DES single-epoch photometry query for a source position.
///
/// The query joins the finalcut object catalog with the zeropoint and
/// exposure tables so every detection carries `MJD_OBS` and `MAG_ZERO`.
/// Running it against the database happens elsewhere.
#[derive(Debug, Clone)]
pub struct ConeSearch {
    /// Table prefix of the data release, e.g. `Y6A1`
    pub release: String,
    pub half_width: f64,
    /// Prepended to `<ID>.tab` to name the result file
    pub output_prefix: String,
}

/// Query text and result file of one source
#[derive(Debug, Clone, Serialize)]
pub struct QueryPlan {
    pub source_id: i64,
    pub sql: String,
    pub output: PathBuf,
}

impl Default for ConeSearch {
    fn default() -> Self {
        Self {
            release: "Y6A1".to_string(),
            half_width: CONE_HALF_WIDTH_DEG,
            output_prefix: "query/DESY6_".to_string(),
        }
    }
}

impl ConeSearch {
    pub fn sql(&self, location: &SourceLocation) -> String {
        let r = &self.release;
        let w = self.half_width;
        format!(
            "select fc.FILENAME, fc.BAND, fc.RA, fc.DEC, fc.NITE, fc.EXPNUM, ex.MJD_OBS, \
             fc.FLUX_AUTO, fc.FLUXERR_AUTO, fc.FLAGS, zp.MAG_ZERO, zp.SIGMA_MAG_ZERO, zp.INSERT_DATE \
             from {r}_FINALCUT_OBJECT fc \
             LEFT JOIN {r}_ZEROPOINT zp ON fc.FILENAME = zp.CATALOGNAME \
             LEFT JOIN {r}_EXPOSURE ex ON (fc.EXPNUM = ex.EXPNUM and fc.NITE = ex.NITE) \
             where ra between ({ra} - {w}) and ({ra} + {w}) \
             and dec between ({dec} - {w}) and ({dec} + {w})",
            ra = location.ra,
            dec = location.dec,
        )
    }

    /// Result file of a source: `<prefix><ID>.tab`
    pub fn output_path(&self, location: &SourceLocation) -> PathBuf {
        PathBuf::from(format!("{}{}.tab", self.output_prefix, location.id))
    }

    pub fn plan(&self, locations: &[SourceLocation]) -> Vec<QueryPlan> {
        locations
            .iter()
            .map(|location| QueryPlan {
                source_id: location.id,
                sql: self.sql(location),
                output: self.output_path(location),
            })
            .collect()
    }
}
