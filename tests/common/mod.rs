#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use legistar_scraper::{
    driver::{Driver, DriverError},
    filters::FilterField,
    utils::{CALENDAR_TABLE_ID, FIRST_ROW_ID, PAGE_LINKS_XPATH, SEARCH_BUTTON_ID},
};

pub const BLOCK_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct Meeting {
    pub name: String,
    pub date: String,
    pub agenda: Option<String>,
    pub minutes: Option<String>,
}

impl Meeting {
    pub fn agenda_only(name: &str, date: &str, id: usize) -> Self {
        Meeting {
            name: name.into(),
            date: date.into(),
            agenda: Some(format!("View.ashx?M=A&ID={}", id)),
            minutes: None,
        }
    }
}

/// In-memory stand-in for a Legistar calendar page.
///
/// The pager shows `BLOCK_SIZE` numbers at a time with `...` links leading to
/// the neighbouring blocks, the way the Telerik grid does, and every page
/// transition takes a few polls to render.
pub struct FakeLegistar {
    pages: Vec<Vec<Meeting>>,
    current: Cell<usize>,
    pending: Cell<Option<(usize, u32)>>,
    render_polls: u32,
    stale_while_rendering: bool,
    never_renders: Option<usize>,
    has_grid: bool,
    years: Vec<String>,
    bodies: Vec<String>,
    pub clicks: RefCell<Vec<String>>,
    pub captured: RefCell<Vec<usize>>,
}

impl FakeLegistar {
    pub fn new(pages: Vec<Vec<Meeting>>) -> Self {
        FakeLegistar {
            pages,
            current: Cell::new(0),
            pending: Cell::new(None),
            render_polls: 2,
            stale_while_rendering: false,
            never_renders: None,
            has_grid: true,
            years: vec!["2020".into(), "2019".into()],
            bodies: vec!["All Committees".into(), "City Council".into()],
            clicks: RefCell::new(vec![]),
            captured: RefCell::new(vec![]),
        }
    }

    /// Site with `count` pages of `rows` agenda-only meetings each.
    pub fn with_page_count(count: usize, rows: usize) -> Self {
        let pages = (0..count)
            .map(|p| {
                (0..rows)
                    .map(|r| {
                        Meeting::agenda_only(
                            &format!("Committee {}-{}", p + 1, r + 1),
                            &format!("{}/{}/2020", p % 12 + 1, r + 1),
                            p * 100 + r,
                        )
                    })
                    .collect()
            })
            .collect();
        FakeLegistar::new(pages)
    }

    pub fn stale_while_rendering(mut self) -> Self {
        self.stale_while_rendering = true;
        self
    }

    /// Clicking the link to this 1-based page never changes the grid.
    pub fn never_renders(mut self, page_number: usize) -> Self {
        self.never_renders = Some(page_number);
        self
    }

    pub fn without_grid(mut self) -> Self {
        self.has_grid = false;
        self
    }

    pub fn page_number(&self) -> usize {
        self.current.get() + 1
    }

    fn signature(&self, page: usize) -> String {
        self.pages[page]
            .first()
            .map(|m| format!("{} {}", m.name, m.date))
            .unwrap_or_default()
    }

    fn labels(&self) -> Vec<String> {
        if self.pages.len() <= 1 {
            return vec![];
        }
        let block = self.current.get() / BLOCK_SIZE;
        let first = block * BLOCK_SIZE;
        let last = (first + BLOCK_SIZE).min(self.pages.len());

        let mut labels = vec![];
        if block > 0 {
            labels.push("...".to_string());
        }
        labels.extend((first..last).map(|p| (p + 1).to_string()));
        if last < self.pages.len() {
            labels.push("...".to_string());
        }
        labels
    }

    fn go_to(&self, page: usize) {
        if self.never_renders == Some(page + 1) {
            return;
        }
        self.pending.set(Some((page, self.render_polls)));
    }

    fn markup(&self) -> String {
        if !self.has_grid {
            return "<html><body><p>Calendar unavailable</p></body></html>".into();
        }
        let link = |href: &Option<String>, label: &str| match href {
            Some(h) => format!(r#"<a href="{}">{}</a>"#, h.replace('&', "&amp;"), label),
            None => "Not available".to_string(),
        };
        let pager_links: String = self
            .labels()
            .iter()
            .map(|l| format!(r#"<a href="javascript:__doPostBack('pager','')">{}</a>"#, l))
            .collect();
        let rows: String = self.pages[self.current.get()]
            .iter()
            .enumerate()
            .map(|(i, m)| {
                format!(
                    r#"<tr id="{}__{}">
                        <td><a href="DepartmentDetail.aspx?ID={}">{}</a></td>
                        <td>{}</td>
                        <td>{}</td>
                        <td>{}</td>
                    </tr>"#,
                    CALENDAR_TABLE_ID,
                    i,
                    i,
                    m.name,
                    m.date,
                    link(&m.agenda, "Agenda"),
                    link(&m.minutes, "Minutes"),
                )
            })
            .collect();

        format!(
            r#"<html><body>
            <table id="{id}">
              <thead>
                <tr class="rgPager"><td colspan="4">
                  <table summary="Data pager">
                    <thead><tr><th scope="col">Data pager</th></tr></thead>
                    <tbody><tr>
                      <td class="rgPagerCell NumericPages"><div>{pager}</div></td>
                      <td class="rgPagerCell rgInfoPart">Page {page}</td>
                    </tr></tbody>
                  </table>
                </td></tr>
                <tr><th>Name</th><th>Meeting Date</th><th>Agenda</th><th>Minutes</th></tr>
              </thead>
              <tbody>{rows}</tbody>
            </table>
            </body></html>"#,
            id = CALENDAR_TABLE_ID,
            pager = pager_links,
            page = self.page_number(),
            rows = rows,
        )
    }
}

impl Driver for FakeLegistar {
    fn navigate(&self, _url: &str) -> Result<(), DriverError> {
        Ok(())
    }

    fn text_by_id(&self, id: &str) -> Result<String, DriverError> {
        if id != FIRST_ROW_ID || !self.has_grid {
            return Err(DriverError::NoSuchElement(id.into()));
        }
        if let Some((target, remaining)) = self.pending.get() {
            if self.stale_while_rendering {
                self.pending.set(None);
                self.current.set(target);
                return Err(DriverError::StaleElement(id.into()));
            }
            match remaining {
                0 => {
                    self.pending.set(None);
                    self.current.set(target);
                }
                1 => {
                    self.pending.set(Some((target, 0)));
                    return Ok(String::new());
                }
                _ => {
                    self.pending.set(Some((target, remaining - 1)));
                    return Ok(self.signature(self.current.get()));
                }
            }
        }
        Ok(self.signature(self.current.get()))
    }

    fn texts_by_xpath(&self, xpath: &str) -> Result<Vec<String>, DriverError> {
        if xpath == PAGE_LINKS_XPATH {
            if !self.has_grid {
                return Ok(vec![]);
            }
            // top and bottom pager
            let labels = self.labels();
            return Ok(labels.iter().chain(labels.iter()).cloned().collect());
        }
        if xpath == FilterField::Years.options_xpath() {
            return Ok(self.years.clone());
        }
        if xpath == FilterField::Bodies.options_xpath() {
            return Ok(self.bodies.clone());
        }
        Ok(vec![])
    }

    fn click_by_id(&self, id: &str) -> Result<(), DriverError> {
        let known = [
            FilterField::Years.input_id(),
            FilterField::Bodies.input_id(),
            SEARCH_BUTTON_ID,
        ];
        if !known.contains(&id) {
            return Err(DriverError::NoSuchElement(id.into()));
        }
        self.clicks.borrow_mut().push(id.into());
        Ok(())
    }

    fn click_by_xpath(&self, xpath: &str, index: usize) -> Result<(), DriverError> {
        self.clicks.borrow_mut().push(format!("{}[{}]", xpath, index));
        if xpath != PAGE_LINKS_XPATH {
            return Ok(());
        }
        let labels = self.labels();
        let label = labels
            .get(index)
            .ok_or_else(|| DriverError::NoSuchElement(format!("{}[{}]", xpath, index)))?;
        let block = self.current.get() / BLOCK_SIZE;
        let target = match label.as_str() {
            "..." if index == 0 => block * BLOCK_SIZE - 1,
            "..." => (block + 1) * BLOCK_SIZE,
            number => number.parse::<usize>().unwrap() - 1,
        };
        self.go_to(target);
        Ok(())
    }

    fn page_source(&self) -> Result<String, DriverError> {
        self.captured.borrow_mut().push(self.page_number());
        Ok(self.markup())
    }
}
