/// Body of `/robots.txt`: allow everything except API and preview routes.
pub fn robots_txt(site_url: &str) -> String {
    format!(
        "User-agent: *\n\
         Allow: /\n\
         \n\
         # Disallow preview and API routes\n\
         Disallow: /api/\n\
         Disallow: /preview/\n\
         \n\
         # Sitemap\n\
         Sitemap: {}/sitemap.xml\n\
         \n\
         # Crawl-delay for respectful crawling\n\
         Crawl-delay: 1\n",
        site_url.trim_end_matches('/')
    )
}
