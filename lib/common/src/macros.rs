mod meta;
