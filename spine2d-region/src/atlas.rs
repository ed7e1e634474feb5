use crate::Error;
use std::collections::HashMap;
use std::str::FromStr;

/// Texture atlas in the libGDX/Spine text format.
#[derive(Clone, Debug, Default)]
pub struct Atlas {
    pub pages: Vec<AtlasPage>,
    pub regions: HashMap<String, AtlasRegion>,
}

impl Atlas {
    pub fn parse(input: &str) -> Result<Self, Error> {
        AtlasParser::default().run(input)
    }

    pub fn region(&self, name: &str) -> Option<&AtlasRegion> {
        self.regions.get(name)
    }

    pub fn page(&self, index: usize) -> Option<&AtlasPage> {
        self.pages.get(index)
    }

    /// Looks up a region and the page it was packed into.
    pub fn find(&self, name: &str) -> Result<(&AtlasRegion, &AtlasPage), Error> {
        let region = self.region(name).ok_or_else(|| Error::UnknownRegion {
            name: name.to_string(),
        })?;
        let page = self.page(region.page).ok_or_else(|| Error::UnknownPage {
            region: region.name.clone(),
            page: region.page,
        })?;
        Ok((region, page))
    }
}

impl FromStr for Atlas {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AtlasPage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub pma: bool,
    pub min_filter: AtlasFilter,
    pub mag_filter: AtlasFilter,
    pub wrap_u: AtlasWrap,
    pub wrap_v: AtlasWrap,
}

impl AtlasPage {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            width: 0,
            height: 0,
            scale: 1.0,
            pma: false,
            min_filter: AtlasFilter::default(),
            mag_filter: AtlasFilter::default(),
            wrap_u: AtlasWrap::default(),
            wrap_v: AtlasWrap::default(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub enum AtlasFilter {
    Nearest,
    #[default]
    Linear,
    MipMap,
    MipMapNearestNearest,
    MipMapNearestLinear,
    MipMapLinearNearest,
    MipMapLinearLinear,
    Other(String),
}

impl AtlasFilter {
    fn from_name(value: &str) -> Self {
        match value {
            "Nearest" => Self::Nearest,
            "Linear" => Self::Linear,
            "MipMap" => Self::MipMap,
            "MipMapNearestNearest" => Self::MipMapNearestNearest,
            "MipMapNearestLinear" => Self::MipMapNearestLinear,
            "MipMapLinearNearest" => Self::MipMapLinearNearest,
            "MipMapLinearLinear" => Self::MipMapLinearLinear,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum AtlasWrap {
    #[default]
    ClampToEdge,
    Repeat,
}

/// A packed region. Sizes and offsets are in page pixels and describe the image unrotated.
#[derive(Clone, Debug, PartialEq)]
pub struct AtlasRegion {
    pub name: String,
    pub page: usize,
    /// Clockwise packing rotation: 0, 90, 180 or 270.
    pub degrees: u16,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub original_width: u32,
    pub original_height: u32,
}

/// Normalized page coordinates of a region, ready for
/// [`RegionAttachment::set_uvs`](crate::RegionAttachment::set_uvs).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextureCoords {
    pub u: f32,
    pub v: f32,
    pub u2: f32,
    pub v2: f32,
    pub rotate: bool,
}

impl AtlasRegion {
    fn named(name: &str, page: usize) -> Self {
        Self {
            name: name.to_string(),
            page,
            degrees: 0,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            offset_x: 0,
            offset_y: 0,
            original_width: 0,
            original_height: 0,
        }
    }

    pub fn is_rotated(&self) -> bool {
        self.degrees == 90
    }

    /// Computes the region's normalized bounds on `page`.
    ///
    /// A rotated region occupies `height x width` pixels on the page. Quads only support the
    /// 90 degree packing flag, so 180/270 degree regions map as unrotated.
    pub fn texture_coords(&self, page: &AtlasPage) -> TextureCoords {
        if matches!(self.degrees, 180 | 270) {
            log::warn!(
                "atlas region '{}' is packed at {} degrees; quad uvs only honour 90",
                self.name,
                self.degrees
            );
        }

        let page_width = page.width.max(1) as f32;
        let page_height = page.height.max(1) as f32;
        let rotate = self.is_rotated();
        let (packed_width, packed_height) = if rotate {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };

        TextureCoords {
            u: self.x as f32 / page_width,
            v: self.y as f32 / page_height,
            u2: (self.x as f32 + packed_width as f32) / page_width,
            v2: (self.y as f32 + packed_height as f32) / page_height,
            rotate,
        }
    }
}

fn invalid(what: &str, value: &str) -> Error {
    Error::AtlasParse {
        message: format!("invalid {what}: {value}"),
    }
}

fn parse_values<T: FromStr, const N: usize>(value: &str) -> Option<[T; N]> {
    let mut parts = value.split(',').map(str::trim);
    let mut parsed = Vec::with_capacity(N);
    for _ in 0..N {
        parsed.push(parts.next()?.parse().ok()?);
    }
    if parts.next().is_some() {
        return None;
    }
    parsed.try_into().ok()
}

fn parse_degrees(value: &str) -> u16 {
    match value {
        "true" => 90,
        "false" => 0,
        other => other
            .parse::<i32>()
            .map(|raw| raw.rem_euclid(360) as u16)
            .unwrap_or(0),
    }
}

fn parse_repeat(value: &str) -> (AtlasWrap, AtlasWrap) {
    use AtlasWrap::{ClampToEdge, Repeat};
    match value {
        "x" => (Repeat, ClampToEdge),
        "y" => (ClampToEdge, Repeat),
        "xy" => (Repeat, Repeat),
        _ => (ClampToEdge, ClampToEdge),
    }
}

#[derive(Default)]
struct AtlasParser {
    atlas: Atlas,
    region: Option<AtlasRegion>,
    // A blank line after a page's regions means the next header line starts a new page.
    expect_page: bool,
    page_has_regions: bool,
}

impl AtlasParser {
    fn run(mut self, input: &str) -> Result<Atlas, Error> {
        self.expect_page = true;
        for raw in input.lines() {
            if raw.trim().is_empty() {
                self.finish_region()?;
                if !self.atlas.pages.is_empty() && self.page_has_regions {
                    self.expect_page = true;
                }
                continue;
            }

            let indented = raw.starts_with([' ', '\t']);
            let line = raw.trim();

            if self.expect_page {
                self.atlas.pages.push(AtlasPage::named(line));
                self.expect_page = false;
                self.page_has_regions = false;
                continue;
            }

            match line.split_once(':') {
                Some((key, value)) => self.apply(key.trim(), value.trim())?,
                None if !indented => {
                    self.finish_region()?;
                    let page = self.atlas.pages.len() - 1;
                    self.region = Some(AtlasRegion::named(line, page));
                }
                None => {}
            }
        }
        self.finish_region()?;

        if self.atlas.pages.is_empty() {
            return Err(Error::AtlasParse {
                message: "empty atlas".to_string(),
            });
        }
        Ok(self.atlas)
    }

    fn finish_region(&mut self) -> Result<(), Error> {
        let Some(mut region) = self.region.take() else {
            return Ok(());
        };
        let fits = |origin: u32, extent: u32| origin.checked_add(extent).is_some();
        if !fits(region.x, region.width.max(region.height))
            || !fits(region.y, region.width.max(region.height))
        {
            return Err(Error::AtlasParse {
                message: format!(
                    "region '{}' bounds {}, {}, {}, {} exceed the page coordinate range",
                    region.name, region.x, region.y, region.width, region.height
                ),
            });
        }
        if region.original_width == 0 {
            region.original_width = region.width;
        }
        if region.original_height == 0 {
            region.original_height = region.height;
        }
        self.atlas.regions.insert(region.name.clone(), region);
        self.page_has_regions = true;
        Ok(())
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), Error> {
        if let Some(region) = self.region.as_mut() {
            apply_region_key(region, key, value)
        } else if let Some(page) = self.atlas.pages.last_mut() {
            apply_page_key(page, key, value)
        } else {
            Ok(())
        }
    }
}

fn apply_page_key(page: &mut AtlasPage, key: &str, value: &str) -> Result<(), Error> {
    match key {
        "size" => {
            let [w, h]: [u32; 2] = parse_values(value).ok_or_else(|| invalid("page size", value))?;
            page.width = w;
            page.height = h;
        }
        "scale" => {
            let scale: f32 = value.parse().map_err(|_| invalid("page scale", value))?;
            page.scale = if scale.is_finite() { scale } else { 1.0 };
        }
        "filter" => {
            let (min, mag) = match value.split_once(',') {
                Some((min, mag)) => (min.trim(), mag.trim()),
                None => (value, value),
            };
            page.min_filter = AtlasFilter::from_name(min);
            page.mag_filter = AtlasFilter::from_name(mag);
        }
        "repeat" => (page.wrap_u, page.wrap_v) = parse_repeat(value),
        "pma" => page.pma = value == "true",
        other => log::debug!("ignoring atlas page key '{other}' on '{}'", page.name),
    }
    Ok(())
}

fn apply_region_key(region: &mut AtlasRegion, key: &str, value: &str) -> Result<(), Error> {
    match key {
        "rotate" => region.degrees = parse_degrees(value),
        "bounds" => {
            let [x, y, w, h]: [u32; 4] =
                parse_values(value).ok_or_else(|| invalid("region bounds", value))?;
            (region.x, region.y, region.width, region.height) = (x, y, w, h);
        }
        "xy" => {
            let [x, y]: [u32; 2] = parse_values(value).ok_or_else(|| invalid("region xy", value))?;
            (region.x, region.y) = (x, y);
        }
        "size" => {
            let [w, h]: [u32; 2] = parse_values(value).ok_or_else(|| invalid("region size", value))?;
            (region.width, region.height) = (w, h);
        }
        "orig" => {
            let [w, h]: [u32; 2] = parse_values(value).ok_or_else(|| invalid("region orig", value))?;
            (region.original_width, region.original_height) = (w, h);
        }
        "offset" => {
            let [x, y]: [i32; 2] = parse_values(value).ok_or_else(|| invalid("region offset", value))?;
            (region.offset_x, region.offset_y) = (x, y);
        }
        "offsets" => {
            let [x, y, w, h]: [i64; 4] =
                parse_values(value).ok_or_else(|| invalid("region offsets", value))?;
            let (Ok(x), Ok(y), Ok(w), Ok(h)) = (
                i32::try_from(x),
                i32::try_from(y),
                u32::try_from(w),
                u32::try_from(h),
            ) else {
                return Err(invalid("region offsets", value));
            };
            region.offset_x = x;
            region.offset_y = y;
            region.original_width = w;
            region.original_height = h;
        }
        other => log::debug!("ignoring atlas region key '{other}' on '{}'", region.name),
    }
    Ok(())
}
