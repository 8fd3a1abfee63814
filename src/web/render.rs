use crate::movies::{MovieCastMember, MovieDetails, MovieSummary};

pub const NO_MOVIES: &str = "No movies found";
pub const NO_RECOMMENDATIONS: &str = "No recommendation found";
pub const PLACEHOLDER_POSTER: &str = "/poster.svg";

const TITLE_LIMIT: usize = 30;
const TITLE_KEEP: usize = 25;

pub const NAV_ITEMS: &[(&str, &str)] = &[
    ("/", "Home"),
    ("#about", "About"),
    ("#contact-us", "Contact Us"),
    ("#privacy", "Privacy Policy"),
    ("#help", "Help"),
];

const STYLE: &str = r#"
[hidden] { display: none !important; }
body { font-family: system-ui, sans-serif; margin: 0; color: #111; }
nav { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; background: #fff; }
nav a { margin-left: 2rem; color: #000; text-decoration: none; font-weight: 500; }
nav a:hover { color: #3b82f6; }
main { max-width: 1440px; margin: 2.5rem auto; padding: 0 0.5rem; }
.heading-row { display: flex; justify-content: space-between; align-items: flex-start; margin-bottom: 2.5rem; }
form.search { display: flex; gap: 0.75rem; width: 50%; }
form.search input { width: 100%; padding: 0.5rem 1rem; border: 1px solid #d1d5db; border-radius: 0.5rem; }
form.search button { background: #2563eb; color: #fff; border: 0; padding: 0.5rem 1rem; border-radius: 0.375rem; }
.error { color: #ef4444; font-size: 0.875rem; margin-top: 0.25rem; }
.grid { display: grid; gap: 2.5rem; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); }
.card { border: 1px solid rgba(0,0,0,0.05); padding: 0.5rem; text-align: center; }
.card img { width: 100%; object-fit: contain; }
.card .title { margin: 0.5rem 0; font-size: 1.5rem; font-weight: 600; }
.empty { margin-top: 13rem; text-align: center; font-size: 2.25rem; font-weight: 700; }
.loader { display: flex; justify-content: center; padding: 2rem; }
.loader::after { content: ""; width: 3rem; height: 3rem; border: 4px solid #3b82f6; border-top-color: transparent; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.details { display: flex; gap: 2rem; margin-bottom: 5rem; }
.details img { width: 400px; }
h1.section { font-size: 1.5rem; padding-bottom: 0.75rem; border-bottom: 1px solid rgba(0,0,0,0.05); }
"#;

// Reports scroll positions near the bottom of the page to the view that owns
// the list, appends what comes back, and detaches the view on page hide.
const SCRIPT: &str = r#"
(() => {
  const feed = document.querySelector('.feed[data-view]');
  if (!feed) return;
  const view = feed.dataset.view;
  const threshold = Number(feed.dataset.threshold || 100);
  const grid = feed.querySelector('.grid');
  const empty = feed.querySelector('.empty');
  const loader = feed.querySelector('.loader');
  let busy = false;

  const show = (chunk, replace) => {
    if (replace) grid.innerHTML = chunk.html;
    else grid.insertAdjacentHTML('beforeend', chunk.html);
    empty.hidden = chunk.total > 0;
  };

  const onScroll = async () => {
    const pos = {
      viewportHeight: window.innerHeight,
      scrollY: window.scrollY,
      documentHeight: document.body.offsetHeight,
    };
    if (busy || pos.viewportHeight + pos.scrollY < pos.documentHeight - threshold) return;
    busy = true;
    loader.hidden = false;
    try {
      const res = await fetch(`/views/${view}/scroll`, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(pos),
      });
      if (res.status === 404) location.reload();
      else if (res.ok) show(await res.json(), false);
    } finally {
      busy = false;
      loader.hidden = true;
    }
  };

  window.addEventListener('scroll', onScroll);
  window.addEventListener('pagehide', () => {
    window.removeEventListener('scroll', onScroll);
    fetch(`/views/${view}`, { method: 'DELETE', keepalive: true });
  });
  window.addEventListener('pageshow', (ev) => { if (ev.persisted) location.reload(); });

  const form = document.querySelector('form.search');
  if (!form) return;
  form.addEventListener('submit', async (ev) => {
    ev.preventDefault();
    const keywords = form.elements.keywords.value;
    const error = form.querySelector('.error');
    loader.hidden = false;
    try {
      const res = await fetch(`/views/${view}/search`, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ keywords }),
      });
      if (res.status === 404) { location.reload(); return; }
      const chunk = await res.json();
      error.textContent = chunk.error || '';
      error.hidden = !chunk.error;
      if (!chunk.error) {
        show(chunk, true);
        document.querySelector('.heading').textContent = chunk.heading;
        history.replaceState(null, '', `/movies?keywords=${encodeURIComponent(keywords)}`);
      }
    } finally {
      loader.hidden = true;
    }
  });
})();
"#;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shorten long titles for the card grid.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_LIMIT {
        let kept: String = title.chars().take(TITLE_KEEP).collect();
        format!("{}...", kept)
    } else {
        title.to_string()
    }
}

pub fn listing_heading(searching: bool) -> &'static str {
    if searching {
        "Searched Movies"
    } else {
        "Popular Movies"
    }
}

/// A list section bound to a view.
pub struct Feed<'a> {
    pub view_id: Option<&'a str>,
    pub items: &'a [MovieSummary],
    pub empty_message: &'a str,
    pub threshold: f64,
}

pub struct ListingPage<'a> {
    pub searching: bool,
    pub input: &'a str,
    pub error: Option<&'a str>,
    pub feed: Feed<'a>,
}

pub struct DetailPage<'a> {
    pub details: Option<&'a MovieDetails>,
    pub cast: Option<&'a [MovieCastMember]>,
    pub recommendations: Feed<'a>,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    image_base_url: String,
}

impl Renderer {
    pub fn new(image_base_url: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn poster_url(&self, poster_path: Option<&str>) -> String {
        match poster_path {
            Some(path) if !path.is_empty() => format!("{}{}", self.image_base_url, path),
            _ => PLACEHOLDER_POSTER.to_string(),
        }
    }

    pub fn movie_card(&self, movie: &MovieSummary) -> String {
        format!(
            r#"<div class="card"><a href="/movies/{id}"><img src="{poster}" alt="{alt} cover" width="800" height="500" loading="lazy"></a><div class="title">{title}</div></div>"#,
            id = movie.id,
            poster = escape(&self.poster_url(movie.poster_path.as_deref())),
            alt = escape(&movie.title),
            title = escape(&truncate_title(&movie.title)),
        )
    }

    pub fn movie_cards(&self, movies: &[MovieSummary]) -> String {
        movies.iter().map(|m| self.movie_card(m)).collect()
    }

    pub fn feed(&self, feed: &Feed<'_>) -> String {
        let view_attr = feed
            .view_id
            .map(|id| format!(r#" data-view="{}" data-threshold="{}""#, escape(id), feed.threshold))
            .unwrap_or_default();
        let empty_hidden = if feed.items.is_empty() { "" } else { " hidden" };

        format!(
            r#"<section class="feed"{view_attr}><div class="grid">{cards}</div><p class="empty"{empty_hidden}>{empty}</p>{loader}</section>"#,
            view_attr = view_attr,
            cards = self.movie_cards(feed.items),
            empty_hidden = empty_hidden,
            empty = escape(feed.empty_message),
            loader = loader(),
        )
    }

    pub fn listing_page(&self, page: &ListingPage<'_>) -> String {
        let error = page.error.unwrap_or_default();
        let error_hidden = if page.error.is_some() { "" } else { " hidden" };

        let body = format!(
            r#"<div class="heading-row"><h1 class="heading">{heading}</h1><form class="search" method="get" action="/movies"><div style="width:100%"><input type="text" name="keywords" placeholder="Search movies..." value="{input}"><p class="error"{error_hidden}>{error}</p></div><button type="submit">Search</button></form></div>{feed}"#,
            heading = listing_heading(page.searching),
            input = escape(page.input),
            error_hidden = error_hidden,
            error = escape(error),
            feed = self.feed(&page.feed),
        );
        layout(listing_heading(page.searching), &body)
    }

    pub fn detail_page(&self, page: &DetailPage<'_>) -> String {
        let details = page.details;
        let title = details.map(|d| d.title.as_str()).unwrap_or_default();
        let overview = details.map(|d| d.overview.as_str()).unwrap_or_default();
        let genres = details.map(|d| d.genre_names()).unwrap_or_default();
        let release_date = details.map(|d| d.release_date.as_str()).unwrap_or_default();
        let poster = self.poster_url(details.and_then(|d| d.poster_path.as_deref()));
        let cast = page
            .cast
            .map(|members| {
                members
                    .iter()
                    .map(|m| m.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        let body = format!(
            r#"<h1 class="section">Movie Details</h1><div class="details"><div><img src="{poster}" alt="{title} cover" width="400" height="600"></div><div><div><strong>Title:</strong> <span>{title}</span></div><p>{overview}</p><div><strong>Genres:</strong> {genres}</div><div><strong>Release Date:</strong> {release_date}</div><div><strong>Casts:</strong> {cast}</div></div></div><h1 class="section">Recommended Movies</h1>{feed}"#,
            poster = escape(&poster),
            title = escape(title),
            overview = escape(overview),
            genres = escape(&genres),
            release_date = escape(release_date),
            cast = escape(&cast),
            feed = self.feed(&page.recommendations),
        );
        let page_title = if title.is_empty() { "Movie Details" } else { title };
        layout(page_title, &body)
    }
}

/// Spinner under a list, shown by the script while a fetch is running.
pub fn loader() -> &'static str {
    r#"<div class="loader" hidden></div>"#
}

pub fn navbar() -> String {
    let links: String = NAV_ITEMS
        .iter()
        .map(|(to, label)| format!(r#"<a href="{}">{}</a>"#, to, label))
        .collect();
    format!(r#"<nav><a href="/" class="logo">MovieDeck</a><div>{}</div></nav>"#, links)
}

pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{title}</title><style>{style}</style></head><body>{nav}<main>{body}</main><script>{script}</script></body></html>"#,
        title = escape(title),
        style = STYLE,
        nav = navbar(),
        body = body,
        script = SCRIPT,
    )
}

pub fn placeholder_poster() -> &'static str {
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="500" viewBox="0 0 800 500"><rect width="800" height="500" fill="#e5e7eb"/><text x="400" y="260" font-family="sans-serif" font-size="48" text-anchor="middle" fill="#9ca3af">No poster</text></svg>"##
}
