//! The embedded single-page editor served at `/`.

/// Static editor page: frontmatter form, body textarea, preview pane, and
/// the fetch calls against the API endpoints. Kept self-contained so the
/// binary ships without an asset pipeline.
pub const EDITOR_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Quill</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 1100px; margin: 2rem auto; padding: 0 1rem; }
    main { display: grid; grid-template-columns: 2fr 1fr; gap: 1.5rem; }
    label { display: block; font-size: 0.85rem; margin-top: 0.75rem; }
    input, textarea, select { width: 100%; box-sizing: border-box; font: inherit; padding: 0.4rem; }
    textarea#body { min-height: 420px; font-family: ui-monospace, monospace; }
    button { margin: 0.75rem 0.5rem 0 0; padding: 0.5rem 1rem; }
    #preview { border: 1px solid #ddd; border-radius: 0.5rem; padding: 1rem; overflow-x: auto; }
    #status { color: #555; min-height: 1.2rem; margin-top: 0.5rem; }
    .tag { display: inline-block; background: #eee; border-radius: 1rem; padding: 0.1rem 0.6rem; margin: 0.2rem 0.2rem 0 0; cursor: pointer; }
    pre { background: #f5f5f5; padding: 1rem; border-radius: 0.5rem; overflow-x: auto; }
  </style>
</head>
<body>
  <h1>Quill</h1>
  <p>Create and edit your MDX blog posts</p>
  <main>
    <section>
      <label for="body">Content</label>
      <textarea id="body" placeholder="Write your blog post content here in Markdown/MDX format..."></textarea>
      <button id="save">Save</button>
      <button id="generate">Generate Article</button>
      <button id="show-preview">Preview</button>
      <div id="status"></div>
      <div id="preview"></div>
    </section>
    <aside>
      <label for="fileName">File Name</label>
      <input id="fileName" placeholder="Enter file name (without .mdx)">
      <label for="title">Title</label>
      <input id="title" placeholder="Post title">
      <label for="description">Description</label>
      <textarea id="description" rows="3" placeholder="Brief description of your post"></textarea>
      <label for="date">Publish Date</label>
      <input id="date" type="date">
      <label for="author">Author</label>
      <input id="author" placeholder="Author name">
      <label for="category">Categories</label>
      <select id="category"></select>
      <div id="tags"></div>
      <label for="status-select">Status</label>
      <select id="status-select">
        <option value="draft">Draft</option>
        <option value="published">Published</option>
        <option value="archived">Archived</option>
      </select>
      <label for="image">Image</label>
      <input id="image" type="file" accept="image/*">
      <label for="idea">Article Idea</label>
      <input id="idea" placeholder="Topic for the generator">
    </aside>
  </main>
  <script>
    'use strict';

    const CATEGORIES = ['Technology', 'Programming', 'Web Development', 'Design', 'Tutorial', 'Opinion', 'News'];
    const selected = [];
    const el = (id) => document.getElementById(id);

    el('date').value = new Date().toISOString().split('T')[0];
    for (const c of CATEGORIES) {
      const option = document.createElement('option');
      option.value = option.textContent = c;
      el('category').appendChild(option);
    }

    el('category').addEventListener('change', () => {
      const c = el('category').value;
      if (c && !selected.includes(c)) { selected.push(c); renderTags(); }
    });

    function renderTags() {
      el('tags').innerHTML = '';
      for (const c of selected) {
        const tag = document.createElement('span');
        tag.className = 'tag';
        tag.textContent = c + ' ×';
        tag.onclick = () => { selected.splice(selected.indexOf(c), 1); renderTags(); };
        el('tags').appendChild(tag);
      }
    }

    function frontmatterBlock() {
      return '---\n' +
        'title: "' + el('title').value + '"\n' +
        'date: "' + el('date').value + '"\n' +
        'description: "' + el('description').value + '"\n' +
        'author: "' + el('author').value + '"\n' +
        'category: [' + selected.join(', ') + ']\n' +
        'status: ' + el('status-select').value + '\n' +
        '---\n\n' + el('body').value;
    }

    function status(text) { el('status').textContent = text; }

    el('save').addEventListener('click', async () => {
      const fileName = el('fileName').value;
      if (!fileName) { status('Please enter a file name.'); return; }
      status('Saving...');
      try {
        const image = el('image').files[0];
        let response;
        if (image) {
          const form = new FormData();
          form.append('content', frontmatterBlock());
          form.append('fileName', fileName);
          form.append('image', image);
          response = await fetch('/api/save-mdx', { method: 'POST', body: form });
        } else {
          response = await fetch('/api/save-mdx', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify({ content: frontmatterBlock(), fileName }),
          });
        }
        const data = await response.json();
        status(data.message || (response.ok ? 'Saved.' : 'Save failed.'));
      } catch (e) {
        status('Failed to save file. Please try again.');
      }
    });

    el('generate').addEventListener('click', async () => {
      const prompt = el('idea').value;
      if (!prompt) { status('Please enter an article idea.'); return; }
      status('Generating...');
      try {
        const response = await fetch('/api/gen-article', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ prompt }),
        });
        if (!response.ok) { status('Failed to generate article.'); return; }
        const data = await response.json();
        el('title').value = data.title;
        el('description').value = data.description;
        el('body').value = data.content;
        status('Article generated successfully.');
      } catch (e) {
        status('Failed to generate article. Please try again.');
      }
    });

    el('show-preview').addEventListener('click', async () => {
      try {
        const response = await fetch('/api/preview', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ content: el('body').value }),
        });
        const data = await response.json();
        el('preview').innerHTML = data.html;
      } catch (e) {
        status('Preview failed.');
      }
    });
  </script>
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_wires_the_api_endpoints() {
        assert!(EDITOR_PAGE.contains("/api/save-mdx"));
        assert!(EDITOR_PAGE.contains("/api/gen-article"));
        assert!(EDITOR_PAGE.contains("/api/preview"));
    }

    #[test]
    fn page_carries_the_category_vocabulary() {
        for name in [
            "Technology",
            "Programming",
            "Web Development",
            "Design",
            "Tutorial",
            "Opinion",
            "News",
        ] {
            assert!(EDITOR_PAGE.contains(name), "missing category {name}");
        }
    }
}
