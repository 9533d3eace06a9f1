/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

pub static REPACK_HELP: &str = "Build a new container from an image directory

Reads info.toml and every <name>.png listed in it from the
directory given by --picdir and writes the container to --outimg.

Without this flag the container given by --image is unpacked
into --picdir instead.";

pub static NOPADDING_HELP: &str = "Do not pad images with background rows

By default an image placed at the left edge and below the top of
the screen whose first pixel is black gets as many black rows
appended as its vertical offset, matching how stock containers
cover the area beneath the logo.

The recorded height never includes these rows.";

pub static THREADS_HELP: &str = "Number of threads used to decode images when unpacking

Defaults to the number of available cores. Repacking is always
sequential since every payload offset depends on the previous one.";
