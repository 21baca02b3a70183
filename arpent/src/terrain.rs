//! Modèles de terrain pour la résolution des hauteurs
//!
//! Le numériseur interroge un [`TerrainModel`] pour donner une hauteur aux
//! positions visées. Deux implémentations : terrain plat et grille
//! régulière lon/lat chargée depuis un fichier ESRI ASCII.

use std::path::Path;

use tracing::info;

use crate::ArpentError;

/// Source de hauteurs de terrain
pub trait TerrainModel {
    /// Hauteur du terrain en mètres à la position donnée, `None` hors
    /// emprise ou sans donnée
    fn height_at(&self, lon: f64, lat: f64) -> Option<f64>;
}

/// Terrain plat à hauteur constante
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain {
    height: f64,
}

impl FlatTerrain {
    pub fn new(height: f64) -> Self {
        Self { height }
    }
}

impl TerrainModel for FlatTerrain {
    fn height_at(&self, _lon: f64, _lat: f64) -> Option<f64> {
        Some(self.height)
    }
}

/// Grille régulière lon/lat avec interpolation bilinéaire
///
/// Les valeurs sont stockées ligne nord en premier, comme dans le fichier
/// source. Les cellules NODATA rendent l'interpolation impossible et la
/// requête retourne `None`.
#[derive(Debug, Clone)]
pub struct GridTerrain {
    ncols: usize,
    nrows: usize,
    xll: f64,
    yll: f64,
    cellsize: f64,
    nodata: f64,
    values: Vec<f64>,
}

impl GridTerrain {
    /// Charge une grille depuis un fichier ESRI ASCII (.asc)
    pub fn from_ascii_file(path: &Path) -> Result<Self, ArpentError> {
        let content = std::fs::read_to_string(path)?;
        let grid = Self::from_ascii(&content, &path.display().to_string())?;
        info!(
            file = %path.display(),
            ncols = grid.ncols,
            nrows = grid.nrows,
            "Terrain grid loaded"
        );
        Ok(grid)
    }

    /// Parse une grille ESRI ASCII
    ///
    /// En-tête attendu : `ncols`, `nrows`, `xllcorner`/`xllcenter`,
    /// `yllcorner`/`yllcenter`, `cellsize`, puis `NODATA_value` optionnel
    /// (défaut -9999), suivi des valeurs ligne nord en premier.
    pub fn from_ascii(content: &str, source: &str) -> Result<Self, ArpentError> {
        let mut ncols: Option<usize> = None;
        let mut nrows: Option<usize> = None;
        let mut xll: Option<f64> = None;
        let mut yll: Option<f64> = None;
        let mut xll_is_center = false;
        let mut yll_is_center = false;
        let mut cellsize: Option<f64> = None;
        let mut nodata = -9999.0;

        let mut lines = content.lines();
        let mut first_data_line: Option<&str> = None;

        for line in lines.by_ref() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(key) = parts.next() else {
                continue;
            };

            // fin d'en-tête : la ligne commence par une valeur numérique
            if key
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+')
            {
                first_data_line = Some(line);
                break;
            }

            let Some(raw) = parts.next() else {
                return Err(ArpentError::invalid_grid(
                    source,
                    format!("header line without value: '{}'", line),
                ));
            };

            match key.to_ascii_lowercase().as_str() {
                "ncols" => ncols = Some(parse_header_usize(raw, source, "ncols")?),
                "nrows" => nrows = Some(parse_header_usize(raw, source, "nrows")?),
                "xllcorner" => xll = Some(parse_header_f64(raw, source, "xllcorner")?),
                "xllcenter" => {
                    xll = Some(parse_header_f64(raw, source, "xllcenter")?);
                    xll_is_center = true;
                }
                "yllcorner" => yll = Some(parse_header_f64(raw, source, "yllcorner")?),
                "yllcenter" => {
                    yll = Some(parse_header_f64(raw, source, "yllcenter")?);
                    yll_is_center = true;
                }
                "cellsize" => cellsize = Some(parse_header_f64(raw, source, "cellsize")?),
                "nodata_value" => nodata = parse_header_f64(raw, source, "NODATA_value")?,
                other => {
                    return Err(ArpentError::invalid_grid(
                        source,
                        format!("unknown header key: '{}'", other),
                    ));
                }
            }
        }

        let ncols = ncols.ok_or_else(|| ArpentError::invalid_grid(source, "missing ncols"))?;
        let nrows = nrows.ok_or_else(|| ArpentError::invalid_grid(source, "missing nrows"))?;
        let mut xll = xll.ok_or_else(|| ArpentError::invalid_grid(source, "missing xllcorner"))?;
        let mut yll = yll.ok_or_else(|| ArpentError::invalid_grid(source, "missing yllcorner"))?;
        let cellsize =
            cellsize.ok_or_else(|| ArpentError::invalid_grid(source, "missing cellsize"))?;

        if ncols == 0 || nrows == 0 {
            return Err(ArpentError::invalid_grid(source, "empty grid"));
        }
        if cellsize <= 0.0 {
            return Err(ArpentError::invalid_grid(source, "cellsize must be positive"));
        }

        if xll_is_center {
            xll -= cellsize / 2.0;
        }
        if yll_is_center {
            yll -= cellsize / 2.0;
        }

        let mut values = Vec::with_capacity(ncols * nrows);
        let data_lines = first_data_line.into_iter().chain(lines);
        for line in data_lines {
            for token in line.split_whitespace() {
                let value: f64 = fast_float::parse(token).map_err(|_| {
                    ArpentError::invalid_grid(source, format!("invalid cell value: '{}'", token))
                })?;
                values.push(value);
            }
        }

        if values.len() != ncols * nrows {
            return Err(ArpentError::invalid_grid(
                source,
                format!(
                    "expected {} values ({}x{}), found {}",
                    ncols * nrows,
                    ncols,
                    nrows,
                    values.len()
                ),
            ));
        }

        Ok(Self {
            ncols,
            nrows,
            xll,
            yll,
            cellsize,
            nodata,
            values,
        })
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Valeur de cellule (colonne, ligne depuis le sud), `None` si NODATA
    fn cell(&self, col: usize, row_from_south: usize) -> Option<f64> {
        let row = self.nrows - 1 - row_from_south;
        let value = self.values[row * self.ncols + col];
        if value == self.nodata {
            None
        } else {
            Some(value)
        }
    }
}

impl TerrainModel for GridTerrain {
    fn height_at(&self, lon: f64, lat: f64) -> Option<f64> {
        if lon < self.xll || lat < self.yll {
            return None;
        }
        if lon > self.xll + self.cellsize * self.ncols as f64 {
            return None;
        }
        if lat > self.yll + self.cellsize * self.nrows as f64 {
            return None;
        }

        // coordonnées continues dans l'espace des centres de cellules
        let gx = ((lon - self.xll) / self.cellsize - 0.5).clamp(0.0, (self.ncols - 1) as f64);
        let gy = ((lat - self.yll) / self.cellsize - 0.5).clamp(0.0, (self.nrows - 1) as f64);

        let c0 = gx.floor() as usize;
        let r0 = gy.floor() as usize;
        let fx = gx - c0 as f64;
        let fy = gy - r0 as f64;
        // les coins de poids nul ne participent pas à l'interpolation
        let c1 = if fx > 0.0 {
            (c0 + 1).min(self.ncols - 1)
        } else {
            c0
        };
        let r1 = if fy > 0.0 {
            (r0 + 1).min(self.nrows - 1)
        } else {
            r0
        };

        let v00 = self.cell(c0, r0)?;
        let v10 = self.cell(c1, r0)?;
        let v01 = self.cell(c0, r1)?;
        let v11 = self.cell(c1, r1)?;

        let south = v00 + (v10 - v00) * fx;
        let north = v01 + (v11 - v01) * fx;
        Some(south + (north - south) * fy)
    }
}

fn parse_header_usize(raw: &str, source: &str, key: &str) -> Result<usize, ArpentError> {
    raw.parse::<usize>()
        .map_err(|_| ArpentError::invalid_grid(source, format!("invalid {}: '{}'", key, raw)))
}

fn parse_header_f64(raw: &str, source: &str, key: &str) -> Result<f64, ArpentError> {
    fast_float::parse(raw)
        .map_err(|_| ArpentError::invalid_grid(source, format!("invalid {}: '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID_2X2: &str = "\
ncols 2
nrows 2
xllcorner 0.0
yllcorner 0.0
cellsize 1.0
NODATA_value -9999
3 4
1 2
";

    #[test]
    fn test_flat_terrain() {
        let terrain = FlatTerrain::new(120.0);
        assert_eq!(terrain.height_at(3.0, 48.0), Some(120.0));
        assert_eq!(FlatTerrain::default().height_at(0.0, 0.0), Some(0.0));
    }

    #[test]
    fn test_grid_cell_centers() {
        let grid = GridTerrain::from_ascii(GRID_2X2, "test.asc").unwrap();
        // ligne sud : 1 2, ligne nord : 3 4
        assert_eq!(grid.height_at(0.5, 0.5), Some(1.0));
        assert_eq!(grid.height_at(1.5, 0.5), Some(2.0));
        assert_eq!(grid.height_at(0.5, 1.5), Some(3.0));
        assert_eq!(grid.height_at(1.5, 1.5), Some(4.0));
    }

    #[test]
    fn test_grid_bilinear_midpoint() {
        let grid = GridTerrain::from_ascii(GRID_2X2, "test.asc").unwrap();
        let h = grid.height_at(1.0, 1.0).unwrap();
        assert!((h - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_grid_out_of_bounds() {
        let grid = GridTerrain::from_ascii(GRID_2X2, "test.asc").unwrap();
        assert_eq!(grid.height_at(-0.1, 0.5), None);
        assert_eq!(grid.height_at(0.5, -0.1), None);
        assert_eq!(grid.height_at(2.1, 0.5), None);
        assert_eq!(grid.height_at(0.5, 2.1), None);
    }

    #[test]
    fn test_grid_edge_clamps_to_border_cells() {
        let grid = GridTerrain::from_ascii(GRID_2X2, "test.asc").unwrap();
        // coin sud-ouest de l'emprise : valeur de la cellule de bord
        assert_eq!(grid.height_at(0.0, 0.0), Some(1.0));
        assert_eq!(grid.height_at(2.0, 2.0), Some(4.0));
    }

    #[test]
    fn test_grid_nodata_blocks_interpolation() {
        let content = "\
ncols 2
nrows 2
xllcorner 0.0
yllcorner 0.0
cellsize 1.0
NODATA_value -9999
3 -9999
1 2
";
        let grid = GridTerrain::from_ascii(content, "test.asc").unwrap();
        assert_eq!(grid.height_at(0.5, 0.5), Some(1.0));
        // interpolation impliquant la cellule NODATA
        assert_eq!(grid.height_at(1.0, 1.0), None);
        assert_eq!(grid.height_at(1.5, 1.5), None);
    }

    #[test]
    fn test_grid_xllcenter_offset() {
        let content = "\
ncols 2
nrows 2
xllcenter 0.5
yllcenter 0.5
cellsize 1.0
3 4
1 2
";
        let grid = GridTerrain::from_ascii(content, "test.asc").unwrap();
        assert_eq!(grid.height_at(0.5, 0.5), Some(1.0));
    }

    #[test]
    fn test_grid_value_count_mismatch() {
        let content = "\
ncols 2
nrows 2
xllcorner 0.0
yllcorner 0.0
cellsize 1.0
1 2 3
";
        let err = GridTerrain::from_ascii(content, "test.asc").unwrap_err();
        assert!(matches!(err, ArpentError::InvalidGrid { .. }));
    }

    #[test]
    fn test_grid_missing_header() {
        let content = "ncols 2\n1 2\n";
        let err = GridTerrain::from_ascii(content, "test.asc").unwrap_err();
        assert!(matches!(err, ArpentError::InvalidGrid { .. }));
    }

    #[test]
    fn test_grid_invalid_cell_value() {
        let content = "\
ncols 1
nrows 1
xllcorner 0.0
yllcorner 0.0
cellsize 1.0
abc
";
        let err = GridTerrain::from_ascii(content, "test.asc").unwrap_err();
        assert!(matches!(err, ArpentError::InvalidGrid { .. }));
    }
}
