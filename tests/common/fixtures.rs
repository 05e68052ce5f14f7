//! Test fixtures for blog pages and feeds
//!
//! Markup modeled on the legacy blog platform: article bodies inside
//! `.entry-content`, site chrome around them, and an RSS 2.0 feed.

pub const BLOG_URL: &str = "https://blog.example.com/dixin";
pub const FEED_URL: &str = "https://blog.example.com/dixin/rss.aspx";

pub const LINQ_URL: &str = "https://blog.example.com/dixin/understanding-linq-to-objects.aspx";
pub const COVARIANCE_URL: &str = "https://blog.example.com/dixin/covariance-and-contravariance.aspx";
pub const HEADINGS_URL: &str = "https://blog.example.com/dixin/headings.aspx";

/// Wrap an article body in a full post page with chrome around it.
pub fn post_page(title: &str, body: &str) -> String {
  format!(
    r#"<!DOCTYPE html>
<html>
<head><title>{title} - Dixin's Blog</title><script>var tracker = 1;</script></head>
<body>
  <nav class="nav"><a href="/">Home</a> <a href="/archive">Archive</a></nav>
  <div class="post">
    <h1 class="entry-title">{title}</h1>
    <time datetime="2010-01-15T09:30:00Z">January 15, 2010</time>
    <div class="entry-content">
      <p>This post is part of a series about the C# language and the .NET framework.</p>
      {body}
      <div class="share">Share on Twitter</div>
      <div id="comments"><p>Great post!</p></div>
    </div>
    <div class="post-tags"><a href="/tags/dotnet">.NET</a></div>
  </div>
  <footer>Copyright</footer>
</body>
</html>"#
  )
}

/// Article with a `pre > code` block tagged through its class.
pub fn linq_page() -> String {
  post_page(
    "Understanding LINQ to Objects",
    r#"<p>Consider the following type:</p>
<pre><code class="language-csharp">public class X {}</code></pre>
<p>It is empty.</p>"#,
  )
}

/// Article whose code is one `CodeCxSpMiddle` paragraph per line.
pub fn covariance_page() -> String {
  post_page(
    "Covariance & Contravariance",
    r#"<p>The listing:</p>
<p class="CodeCxSpMiddle">line1</p>
<p class="CodeCxSpMiddle">line2</p>
<p class="CodeCxSpMiddle">line3</p>
<p>After the listing.</p>"#,
  )
}

/// Article using only `h3`/`h4` headings.
pub fn headings_page() -> String {
  post_page(
    "Headings",
    r#"<h3>Background</h3>
<p>Some background on the topic.</p>
<h4>Details</h4>
<p>And the details.</p>"#,
  )
}

/// RSS feed listing the three posts.
pub fn sample_feed() -> String {
  format!(
    r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0">
  <channel>
    <title>Dixin's Blog</title>
    <link>{BLOG_URL}</link>
    <item>
      <title>Understanding LINQ to Objects</title>
      <link>{LINQ_URL}</link>
      <pubDate>Mon, 12 Apr 2010 08:00:00 GMT</pubDate>
      <description><![CDATA[<p>How <b>LINQ</b> to Objects works under the hood.</p>]]></description>
      <category>C#</category>
      <category>LINQ</category>
    </item>
    <item>
      <title>Covariance &amp; Contravariance</title>
      <link>{COVARIANCE_URL}</link>
      <pubDate>Tue, 13 Apr 2010 08:00:00 GMT</pubDate>
      <category>C#</category>
    </item>
    <item>
      <title>Headings</title>
      <link>{HEADINGS_URL}</link>
      <pubDate>Wed, 14 Apr 2010 08:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#
  )
}

/// A listing page linking to `posts`, optionally pointing at a next page.
pub fn listing_page(posts: &[&str], next: Option<&str>) -> String {
  let entries: String = posts
    .iter()
    .map(|url| format!(r#"<h2 class="entry-title"><a href="{url}">Post</a></h2><p>Teaser</p>"#))
    .collect();
  let next = next
    .map(|url| format!(r#"<div class="navigation"><a rel="next" href="{url}">Older posts</a></div>"#))
    .unwrap_or_default();
  format!("<html><body><div id=\"main\">{entries}{next}</div></body></html>")
}
